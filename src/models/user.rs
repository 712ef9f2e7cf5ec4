use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// The authenticated user for the current request.
///
/// Identity is owned by an upstream gateway; by the time a request reaches
/// this service it carries a stable user id and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: ObjectId,
}
