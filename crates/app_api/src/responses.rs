use serde::Serialize;

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}
