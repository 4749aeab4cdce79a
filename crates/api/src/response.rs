//! Success envelope: every 2xx body is `{ "data": ... }`.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
