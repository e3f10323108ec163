//! Product and image management.
//!
//! New products and image changes arrive as multipart forms; the text-only
//! update is a plain urlencoded form.

use std::collections::HashSet;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tracing::{info, instrument, warn};

use prosper_core::{FieldErrors, ImageId, ProductId};

use crate::db::{CatalogRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::ProductForm;
use crate::middleware::RequireAdminAuth;
use crate::models::{CurrentAdmin, Image, Product};
use crate::state::AppState;

use super::views::AdminUserView;

const PRODUCTS_PATH: &str = "/products";

/// Largest accepted upload, all files together.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

pub const IMAGE_REQUIRED: &str = "A featured image is required";
pub const NOT_AN_IMAGE: &str = "Images must be jpg, jpeg, png, gif or webp files";

/// A product with its images, featured image first.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub product: Product,
    pub images: Vec<Image>,
}

impl ProductView {
    #[must_use]
    pub fn featured_image(&self) -> Option<&Image> {
        self.images.iter().find(|i| i.is_featured_img)
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub products: Vec<ProductView>,
    pub featured_products: Vec<ProductView>,
    pub form: ProductForm,
    pub errors: FieldErrors,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(PRODUCTS_PATH, get(index))
        .route("/products/new", post(create))
        .route("/products/{id}/update", post(update))
        .route("/products/{id}/images", post(update_images))
        .route("/products/{id}/delete", post(delete))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// GET /products
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<ProductsTemplate> {
    page(&state, &admin, ProductForm::default(), FieldErrors::new()).await
}

/// POST /products/new
#[instrument(skip_all, fields(admin = %admin.username))]
async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let upload = read_upload(multipart).await?;
    let mut errors = upload.form.validate().err().unwrap_or_default();

    let file = upload.files.into_iter().next();
    if file.is_none() {
        let message = if upload.rejected_files { NOT_AN_IMAGE } else { IMAGE_REQUIRED };
        errors.add("featured_image", message);
    }
    let Some(file) = file.filter(|_| errors.is_empty()) else {
        return rejected(&state, &admin, upload.form, errors).await;
    };

    let location = state.images().save(&file.name, file.bytes).await?;
    let form = upload.form;
    let created = CatalogRepository::new(state.pool())
        .create_product_with_image(
            form.name.trim(),
            form.description.trim(),
            form.featured(),
            &location,
        )
        .await;

    match created {
        Ok((product, _)) => {
            info!(product_id = %product.id, name = %product.name, "Product created");
            Ok(Redirect::to(PRODUCTS_PATH).into_response())
        }
        Err(e) => {
            // `save` never reuses a name, so this file is ours alone
            remove_file(&state, &location).await;
            if let RepositoryError::Conflict(message) = e {
                let mut errors = FieldErrors::new();
                errors.add("name", message);
                return rejected(&state, &admin, form, errors).await;
            }
            Err(e.into())
        }
    }
}

/// POST /products/{id}/update
#[instrument(skip_all, fields(product_id = id, admin = %admin.username))]
async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    if let Err(errors) = form.validate() {
        let message = errors.first("name").unwrap_or("Invalid product").to_owned();
        return Err(AppError::BadRequest(message));
    }

    CatalogRepository::new(state.pool())
        .update_product(
            ProductId::new(id),
            form.name.trim(),
            form.description.trim(),
            form.featured(),
        )
        .await?;

    info!("Product updated");
    Ok(Redirect::to(PRODUCTS_PATH))
}

/// POST /products/{id}/images
///
/// Adds any uploaded files, deletes the checked images, then switches the
/// featured image.
#[instrument(skip_all, fields(product_id = id, admin = %admin.username))]
async fn update_images(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Redirect> {
    let product_id = ProductId::new(id);
    let repo = CatalogRepository::new(state.pool());
    repo.get_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let upload = read_upload(multipart).await?;
    if upload.rejected_files {
        return Err(AppError::BadRequest(NOT_AN_IMAGE.to_string()));
    }

    for file in upload.files {
        let location = state.images().save(&file.name, file.bytes).await?;
        if let Err(e) = repo.add_image(product_id, &location).await {
            remove_file(&state, &location).await;
            return Err(e.into());
        }
        info!(%location, "Image added");
    }

    let deleted: HashSet<ImageId> = upload.delete_images.iter().copied().collect();
    for image_id in &deleted {
        owned_image(&repo, product_id, *image_id).await?;
        let image = repo.delete_image(*image_id).await?;
        remove_file(&state, &image.location).await;
        info!(image_id = %image.id, "Image deleted");
    }

    if let Some(image_id) = upload.featured_image.filter(|i| !deleted.contains(i)) {
        owned_image(&repo, product_id, image_id).await?;
        repo.make_featured_image(image_id).await?;
        info!(%image_id, "Featured image changed");
    }

    Ok(Redirect::to(PRODUCTS_PATH))
}

/// POST /products/{id}/delete
#[instrument(skip_all, fields(product_id = id, admin = %admin.username))]
async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let images = CatalogRepository::new(state.pool())
        .delete_product(ProductId::new(id))
        .await?;

    for image in &images {
        remove_file(&state, &image.location).await;
    }

    info!(images = images.len(), "Product deleted");
    Ok(Redirect::to(PRODUCTS_PATH))
}

// =============================================================================
// Helpers
// =============================================================================

async fn page(
    state: &AppState,
    admin: &CurrentAdmin,
    form: ProductForm,
    errors: FieldErrors,
) -> Result<ProductsTemplate> {
    let repo = CatalogRepository::new(state.pool());
    let products = group_images(repo.list_products().await?, repo.list_all_images().await?);
    let featured_products = products
        .iter()
        .filter(|p| p.product.is_featured_product)
        .cloned()
        .collect();

    Ok(ProductsTemplate {
        admin_user: AdminUserView::from(admin),
        current_path: PRODUCTS_PATH,
        products,
        featured_products,
        form,
        errors,
    })
}

async fn rejected(
    state: &AppState,
    admin: &CurrentAdmin,
    form: ProductForm,
    errors: FieldErrors,
) -> Result<Response> {
    let page = page(state, admin, form, errors).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

/// Attach images to their products, featured image first, then oldest.
fn group_images(products: Vec<Product>, mut images: Vec<Image>) -> Vec<ProductView> {
    images.sort_by_key(|i| (!i.is_featured_img, i.created_date, i.id.as_i32()));

    products
        .into_iter()
        .map(|product| ProductView {
            images: images
                .iter()
                .filter(|i| i.product_id == product.id)
                .cloned()
                .collect(),
            product,
        })
        .collect()
}

/// `NotFound` unless the image exists and belongs to `product_id`.
async fn owned_image(
    repo: &CatalogRepository<'_>,
    product_id: ProductId,
    image_id: ImageId,
) -> Result<Image> {
    repo.get_image(image_id)
        .await?
        .filter(|i| i.product_id == product_id)
        .ok_or_else(|| AppError::NotFound(format!("image {image_id} of product {product_id}")))
}

/// Remove a stored file after its row is gone; failures only leave an orphan.
async fn remove_file(state: &AppState, location: &str) {
    if let Err(e) = state.images().delete(location).await {
        warn!(error = %e, %location, "Failed to remove image file");
    }
}

// =============================================================================
// Multipart
// =============================================================================

#[derive(Debug)]
struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct ProductUpload {
    form: ProductForm,
    files: Vec<UploadedFile>,
    /// A file was sent that is not an image
    rejected_files: bool,
    delete_images: Vec<ImageId>,
    featured_image: Option<ImageId>,
}

async fn read_upload(mut multipart: Multipart) -> Result<ProductUpload> {
    let mut upload = ProductUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        let name = field.name().unwrap_or_default().to_owned();

        if let Some(file_name) = field.file_name().map(str::to_owned) {
            let bytes = field.bytes().await.map_err(bad_upload)?;
            // Browsers send an empty part for an untouched file input
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            if is_image_name(&file_name) {
                upload.files.push(UploadedFile {
                    name: file_name,
                    bytes: bytes.to_vec(),
                });
            } else {
                upload.rejected_files = true;
            }
            continue;
        }

        let value = field.text().await.map_err(bad_upload)?;
        match name.as_str() {
            "name" => upload.form.name = value,
            "description" => upload.form.description = value,
            "is_featured_product" => upload.form.is_featured_product = Some(value),
            "delete_images" => upload.delete_images.push(parse_image_id(&value)?),
            "featured_image" if !value.trim().is_empty() => {
                upload.featured_image = Some(parse_image_id(&value)?);
            }
            _ => {}
        }
    }

    Ok(upload)
}

fn is_image_name(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

fn parse_image_id(value: &str) -> Result<ImageId> {
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid image id: {value}")))
}

fn bad_upload(e: MultipartError) -> AppError {
    AppError::BadRequest(e.body_text())
}
