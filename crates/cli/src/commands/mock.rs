//! Random fixture data for development databases.
//!
//! Dates fall between 2020-01-01 and today. Pass `--seed` to get the same
//! rows on every run.

use chrono::{Days, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use prosper_admin::services::auth::{AuthError, hash_password};
use prosper_core::{ContactMethod, MessageStatus, RequestStatus};

use super::{CommandError, connect};

const FIRST_NAMES: &[&str] = &[
    "Avery", "Blake", "Casey", "Dana", "Emerson", "Finley", "Harper", "Jordan", "Kendall",
    "Logan", "Morgan", "Parker", "Quinn", "Riley", "Sawyer", "Taylor",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Brooks", "Carter", "Dawson", "Ellis", "Fischer", "Garcia", "Hughes", "Keller",
    "Lopez", "Mitchell", "Nguyen", "Owens", "Patel", "Reyes", "Sullivan",
];

const MAIL_DOMAINS: &[&str] = &["example.com", "example.net", "example.org"];

const HOW_HEARD: &[&str] = &["Facebook", "Instagram", "Ad", "Word of Mouth"];

const SENTENCES: &[&str] = &[
    "I am looking for a piece that fits a narrow wall in our hallway.",
    "Could it be stained to match the oak trim we already have?",
    "We saw your cornhole boards at a tailgate and loved them.",
    "The dimensions would be roughly three feet wide and two feet tall.",
    "Our team colors are navy and gold if that helps with the design.",
    "It is a gift, so we would need it before the end of the month.",
    "Is there an option to add hooks or a small shelf underneath?",
    "Please let me know what a rough price would be.",
    "We are happy to pick it up if delivery is a problem.",
    "I would like the family name burned into the top board.",
    "Reclaimed wood would be perfect for the look we are going for.",
    "Let me know if you need photos of the space.",
];

/// Chance that an inquiry is archived.
const ARCHIVED_CHANCE: f64 = 0.2;

#[derive(Debug, Error)]
pub enum MockError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Rows to insert per table.
#[derive(Debug, Clone, Copy)]
pub struct MockCounts {
    pub admins: u32,
    pub requests: u32,
    pub questions: u32,
    pub contacts: u32,
    pub visitors: u32,
}

/// Insert random rows into every inbox table plus admins and visitors.
///
/// # Errors
///
/// Returns `MockError` if the connection or any insert fails.
pub async fn load(counts: MockCounts, seed: Option<u64>) -> Result<(), MockError> {
    let pool = connect("ADMIN_DATABASE_URL").await?;
    let mut fake = Faker::new(seed);

    for _ in 0..counts.admins {
        insert_admin(&pool, &mut fake).await?;
    }
    for _ in 0..counts.requests {
        insert_request(&pool, &mut fake).await?;
    }
    for _ in 0..counts.questions {
        insert_question(&pool, &mut fake).await?;
    }
    for _ in 0..counts.contacts {
        insert_contact(&pool, &mut fake).await?;
    }
    let mut visitors = 0;
    for _ in 0..counts.visitors {
        visitors += insert_visitor(&pool, &mut fake).await?;
    }

    info!(
        admins = counts.admins,
        requests = counts.requests,
        questions = counts.questions,
        contacts = counts.contacts,
        visitors,
        "Mock data loaded"
    );
    Ok(())
}

async fn insert_admin(pool: &PgPool, fake: &mut Faker) -> Result<(), MockError> {
    let (first, last) = fake.person();
    let username = fake.username(first, last);
    let password_hash = hash_password(&fake.password())?;

    sqlx::query(
        r"
        INSERT INTO admin.admin_user (username, password_hash, first_name, last_name, created_date)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (username) DO NOTHING
        ",
    )
    .bind(username)
    .bind(password_hash)
    .bind(first)
    .bind(last)
    .bind(fake.date())
    .execute(pool)
    .await?;
    Ok(())
}

async fn insert_request(pool: &PgPool, fake: &mut Faker) -> Result<(), MockError> {
    let (first, last) = fake.person();
    let method = *[None, Some(ContactMethod::Phone), Some(ContactMethod::Email)]
        .choose(&mut fake.rng)
        .unwrap_or(&None);
    let status = *RequestStatus::ALL
        .choose(&mut fake.rng)
        .unwrap_or(&RequestStatus::Unread);

    sqlx::query(
        r"
        INSERT INTO site.request
            (email_address, phone_number, name, contact_method, description,
             how_hear, status, is_archived, created_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ",
    )
    .bind(fake.email(first, last))
    .bind(fake.phone())
    .bind(format!("{first} {last}"))
    .bind(method)
    .bind(fake.description(2, 5))
    .bind(fake.how_heard())
    .bind(status)
    .bind(fake.archived())
    .bind(fake.date())
    .execute(pool)
    .await?;
    Ok(())
}

async fn insert_question(pool: &PgPool, fake: &mut Faker) -> Result<(), MockError> {
    let (first, last) = fake.person();

    sqlx::query(
        r"
        INSERT INTO site.question
            (email_address, name, content, how_hear, status, is_archived, created_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(fake.email(first, last))
    .bind(format!("{first} {last}"))
    .bind(fake.description(1, 2))
    .bind(fake.how_heard())
    .bind(fake.message_status())
    .bind(fake.archived())
    .bind(fake.date())
    .execute(pool)
    .await?;
    Ok(())
}

async fn insert_contact(pool: &PgPool, fake: &mut Faker) -> Result<(), MockError> {
    let (first, last) = fake.person();
    // At least one way to reach them
    let (email, phone) = match fake.rng.random_range(0..3) {
        0 => (Some(fake.email(first, last)), None),
        1 => (None, Some(fake.phone())),
        _ => (Some(fake.email(first, last)), Some(fake.phone())),
    };

    sqlx::query(
        r"
        INSERT INTO site.contact
            (name, phone_number, email_address, status, is_archived, created_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(format!("{first} {last}"))
    .bind(phone)
    .bind(email)
    .bind(fake.message_status())
    .bind(fake.archived())
    .bind(fake.date())
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns 1 when a row was inserted, 0 when the address already existed.
async fn insert_visitor(pool: &PgPool, fake: &mut Faker) -> Result<u64, MockError> {
    let first_visit = fake.date();
    let last_visit = fake.date_between(first_visit, fake.today);

    let inserted = sqlx::query(
        r"
        INSERT INTO site.visitor (ip_address, visit_count, first_visit, last_visit)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (ip_address) DO NOTHING
        ",
    )
    .bind(fake.ip_address())
    .bind(fake.rng.random_range(1..=25_i32))
    .bind(first_visit)
    .bind(last_visit)
    .execute(pool)
    .await?;
    Ok(inserted.rows_affected())
}

/// Small fake-data generator over a seedable RNG.
struct Faker {
    rng: StdRng,
    start: NaiveDate,
    today: NaiveDate,
}

impl Faker {
    fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            rng,
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            today: Utc::now().date_naive(),
        }
    }

    fn pick(&mut self, options: &[&'static str]) -> &'static str {
        options.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn person(&mut self) -> (&'static str, &'static str) {
        (self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
    }

    fn username(&mut self, first: &str, last: &str) -> String {
        let n: u16 = self.rng.random_range(10..1000);
        format!("{}{}{n}", first.to_lowercase(), last.to_lowercase())
            .chars()
            .take(20)
            .collect()
    }

    fn password(&mut self) -> String {
        let n: u32 = self.rng.random_range(1000..10_000);
        format!("Mock!{n}pw")
    }

    fn email(&mut self, first: &str, last: &str) -> String {
        let domain = self.pick(MAIL_DOMAINS);
        format!("{}.{}@{domain}", first.to_lowercase(), last.to_lowercase())
    }

    fn phone(&mut self) -> String {
        format!(
            "{:03}-555-{:04}",
            self.rng.random_range(201..990),
            self.rng.random_range(0..10_000)
        )
    }

    fn ip_address(&mut self) -> String {
        format!(
            "203.0.{}.{}",
            self.rng.random_range(0..=255_u8),
            self.rng.random_range(1..=254_u8)
        )
    }

    fn how_heard(&mut self) -> &'static str {
        self.pick(HOW_HEARD)
    }

    fn message_status(&mut self) -> MessageStatus {
        *MessageStatus::ALL
            .choose(&mut self.rng)
            .unwrap_or(&MessageStatus::Unread)
    }

    fn archived(&mut self) -> bool {
        self.rng.random_bool(ARCHIVED_CHANCE)
    }

    fn date(&mut self) -> NaiveDate {
        self.date_between(self.start, self.today)
    }

    fn date_between(&mut self, from: NaiveDate, to: NaiveDate) -> NaiveDate {
        let span = u64::try_from((to - from).num_days()).unwrap_or(0);
        from + Days::new(self.rng.random_range(0..=span))
    }

    /// `min..=max` paragraphs of three to five sentences, blank-line separated.
    fn description(&mut self, min: usize, max: usize) -> String {
        let paragraphs = self.rng.random_range(min..=max);
        (0..paragraphs)
            .map(|_| {
                let sentences = self.rng.random_range(3..=5);
                (0..sentences)
                    .map(|_| self.pick(SENTENCES))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
