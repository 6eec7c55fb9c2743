use crate::roster::Roster;
use crate::session::Session;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub roster: Roster,
    pub session: Session,
}

impl AppState {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            session: Session::default(),
        }
    }
}
