use utoipa::OpenApi;

use crate::handlers::SaveResponse;
use crate::logic::SaveParams;
use pushping_common::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::liveness_handler, crate::handlers::save_handler),
    components(schemas(SaveParams, SaveResponse, MessageResponse)),
    tags(
        (name = "Registry", description = "Device push token registration")
    )
)]
pub struct RegistryApiDoc;
