use actix_web::{HttpResponse, Responder, get, post, web};
use log::error;

use marko_core::{GenerationParams, MarkoError, generate};

/// HTTP POST endpoint `/v1/generate`
///
/// The body is the corpus as UTF-8 plain text; the query string carries any
/// `GenerationParams` field (`state_size`, `count`, `min_tries`, `start`, ...).
/// A fresh chain is built for every request and dropped with it.
///
/// # Responses
/// - 200 with a JSON array of sentences (possibly empty)
/// - 400 for invalid parameters or a non UTF-8 body
/// - 422 when the corpus is unusable or the start seed is unknown
#[post("/v1/generate")]
async fn post_generate(query: web::Query<GenerationParams>, body: web::Bytes) -> impl Responder {
	let params = query.into_inner();

	let task = move || -> marko_core::Result<Vec<String>> {
		let text = std::str::from_utf8(&body)
			.map_err(|_| MarkoError::InvalidArgument("Body must be UTF-8 text".to_owned()))?;
		generate(text, params)
	};
	match web::block(task).await {
		Ok(Ok(sentences)) => HttpResponse::Ok().json(sentences),
		Ok(Err(e)) => error_response(e),
		Err(e) => {
			error!("Generation task failed: {e}");
			HttpResponse::InternalServerError().body("Generation task failed")
		}
	}
}

#[get("/v1/health")]
async fn get_health() -> impl Responder {
	HttpResponse::Ok().body("ok")
}

/// Maps request-level errors to status codes.
fn error_response(e: MarkoError) -> HttpResponse {
	match e {
		MarkoError::EmptyCorpus | MarkoError::UnknownSeed(_) => {
			HttpResponse::UnprocessableEntity().body(e.to_string())
		}
		MarkoError::InvalidArgument(_) => HttpResponse::BadRequest().body(e.to_string()),
		// Sampler failures are absorbed by the session
		MarkoError::DeadEnd { .. } | MarkoError::StepLimitExceeded { .. } => {
			error!("Unexpected sampler failure: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// Registers every route on an `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(post_generate).service(get_health);
}
