use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

/// Body accepted by POST and PUT; other keys are ignored.
#[derive(ToSchema)]
pub struct NameInputDoc { pub name: String }

#[derive(Serialize, ToSchema)]
pub struct StateDoc {
    #[serde(rename = "__class__")]
    #[schema(example = "State")]
    pub class: String,
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct CityDoc {
    #[serde(rename = "__class__")]
    #[schema(example = "City")]
    pub class: String,
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub name: String,
    pub state_id: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::states::list_states,
        crate::routes::states::get_state,
        crate::routes::states::create_state,
        crate::routes::states::update_state,
        crate::routes::states::delete_state,
        crate::routes::cities::list_cities,
        crate::routes::cities::get_city,
        crate::routes::cities::create_city,
        crate::routes::cities::update_city,
        crate::routes::cities::delete_city,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            NameInputDoc,
            StateDoc,
            CityDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "states"),
        (name = "cities")
    )
)]
pub struct ApiDoc;
