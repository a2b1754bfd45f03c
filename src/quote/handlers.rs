use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use super::draft::apply_updates;
use super::model::{
    ListQuery, MessageResponse, Pagination, PreviewRequest, PreviewResponse, Quotation,
    QuoteListResponse, QuoteResponse,
};
use super::template::new_draft;
use super::totals::compute_totals;
use super::validation::Validator;
use crate::auth::CurrentUser;
use crate::document::{DocumentError, Generator};
use crate::store::StoreError;
use crate::AppState;

fn store_error_response(err: &StoreError, context: &str) -> HttpResponse {
    match err {
        StoreError::NotFound => {
            HttpResponse::NotFound().json(crate::ErrorResponse::not_found("Quotation not found"))
        }
        StoreError::Validation(msg) => {
            HttpResponse::BadRequest().json(crate::ErrorResponse::bad_request(msg))
        }
        StoreError::Conflict(msg) => {
            HttpResponse::Conflict().json(crate::ErrorResponse::new("Conflict", msg))
        }
        StoreError::Transient(msg) => {
            log::error!("{}: {}", context, msg);
            HttpResponse::ServiceUnavailable()
                .json(crate::ErrorResponse::new("ServiceUnavailable", context))
        }
    }
}

fn document_error_response(err: &DocumentError) -> HttpResponse {
    match err {
        DocumentError::InvalidQuotation(msg) => {
            HttpResponse::BadRequest().json(crate::ErrorResponse::bad_request(msg))
        }
        other => {
            log::error!("Failed to generate quotation PDF: {}", other);
            HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error(&other.to_string()))
        }
    }
}

/// Render on the blocking pool and wrap the bytes as a download.
async fn render_pdf(state: &AppState, quotation: Quotation) -> HttpResponse {
    let generator = state.pdf.clone();
    let result = web::block(move || generator.generate(&quotation)).await;

    match result {
        Ok(Ok(document)) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(document.filename)],
            })
            .body(document.pdf),
        Ok(Err(e)) => document_error_response(&e),
        Err(e) => {
            log::error!("PDF render task failed: {:?}", e);
            HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Failed to generate PDF"))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Quotations",
    get,
    path = "/quotes",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page of quotations, newest first", body = QuoteListResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_quotes(
    _user: CurrentUser,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let (page, limit) = query.resolve();

    match state.quotes.list(page, limit).await {
        Ok(listing) => HttpResponse::Ok().json(QuoteListResponse {
            pagination: Pagination::new(listing.total, page, limit),
            quotes: listing.items,
        }),
        Err(e) => store_error_response(&e, "Failed to list quotations"),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Quotations",
    post,
    path = "/quotes",
    request_body = Quotation,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Quotation saved", body = QuoteResponse),
        (status = 400, description = "Quotation is incomplete"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_quote(
    user: CurrentUser,
    state: web::Data<AppState>,
    body: web::Json<Quotation>,
) -> impl Responder {
    let quotation = body.into_inner();
    if let Err(message) = quotation.validate() {
        return HttpResponse::BadRequest().json(crate::ErrorResponse::bad_request(&message));
    }

    match state.quotes.create(quotation).await {
        Ok(stored) => {
            log::info!(
                "Quotation {} saved by {} as {}",
                stored.quotation.quote_details.quote_number,
                user.email,
                stored.id
            );
            HttpResponse::Created().json(QuoteResponse { quote: stored })
        }
        Err(e) => store_error_response(&e, "Failed to save quotation"),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Quotations",
    get,
    path = "/quotes/{id}",
    params(("id" = Uuid, Path, description = "Quotation ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Quotation found", body = QuoteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Quotation not found")
    )
)]
pub async fn get_quote(
    _user: CurrentUser,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> impl Responder {
    match state.quotes.get(id.into_inner()).await {
        Ok(stored) => HttpResponse::Ok().json(QuoteResponse { quote: stored }),
        Err(e) => store_error_response(&e, "Failed to load quotation"),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Quotations",
    delete,
    path = "/quotes/{id}",
    params(("id" = Uuid, Path, description = "Quotation ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Quotation deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Quotation not found")
    )
)]
pub async fn delete_quote(
    user: CurrentUser,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> impl Responder {
    let id = id.into_inner();
    match state.quotes.delete(id).await {
        Ok(()) => {
            log::info!("Quotation {} deleted by {}", id, user.email);
            HttpResponse::Ok().json(MessageResponse {
                message: "Quote deleted successfully".to_string(),
            })
        }
        Err(e) => store_error_response(&e, "Failed to delete quotation"),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Quotations",
    get,
    path = "/quotes/template",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Blank draft prefilled with company details", body = Quotation),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_template(_user: CurrentUser, state: web::Data<AppState>) -> impl Responder {
    let today = chrono::Local::now().date_naive();
    HttpResponse::Ok().json(new_draft(&state.company, today))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Quotations",
    post,
    path = "/quotes/preview",
    request_body = PreviewRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Edited draft with live totals", body = PreviewResponse),
        (status = 400, description = "An edit referenced a missing item"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn preview_quote(
    _user: CurrentUser,
    body: web::Json<PreviewRequest>,
) -> impl Responder {
    let PreviewRequest { mut draft, updates } = body.into_inner();

    if let Err(e) = apply_updates(&mut draft, updates) {
        return HttpResponse::BadRequest().json(crate::ErrorResponse::bad_request(&e.to_string()));
    }

    let totals = compute_totals(&draft.items, draft.tax_details.as_ref());
    HttpResponse::Ok().json(PreviewResponse { draft, totals })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Quotations",
    post,
    path = "/quotes/pdf",
    request_body = Quotation,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Proposal PDF", content_type = "application/pdf"),
        (status = 400, description = "Quotation is incomplete"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "PDF generation failed")
    )
)]
pub async fn draft_pdf(
    _user: CurrentUser,
    state: web::Data<AppState>,
    body: web::Json<Quotation>,
) -> impl Responder {
    render_pdf(&state, body.into_inner()).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "Quotations",
    get,
    path = "/quotes/{id}/pdf",
    params(("id" = Uuid, Path, description = "Quotation ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Proposal PDF", content_type = "application/pdf"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Quotation not found"),
        (status = 500, description = "PDF generation failed")
    )
)]
pub async fn quote_pdf(
    _user: CurrentUser,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> impl Responder {
    match state.quotes.get(id.into_inner()).await {
        Ok(stored) => render_pdf(&state, stored.quotation).await,
        Err(e) => store_error_response(&e, "Failed to load quotation"),
    }
}

/// Configure quotation routes. Fixed paths come before `{id}`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quotes")
            .route("", web::get().to(list_quotes))
            .route("", web::post().to(create_quote))
            .route("/template", web::get().to(get_template))
            .route("/preview", web::post().to(preview_quote))
            .route("/pdf", web::post().to(draft_pdf))
            .route("/{id}", web::get().to(get_quote))
            .route("/{id}", web::delete().to(delete_quote))
            .route("/{id}/pdf", web::get().to(quote_pdf)),
    );
}
