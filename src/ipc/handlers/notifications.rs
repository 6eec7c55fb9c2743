use crate::ipc::error::ok;
use crate::ipc::helpers::require_login;
use crate::ipc::types::{AppState, Request};
use crate::model::Notification;
use serde_json::json;

fn handle_notifications_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let user = match require_login(state, req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let notifications: Vec<&Notification> =
        state.roster.notifications_for(&user.username).collect();
    ok(&req.id, json!({ "notifications": notifications }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "notifications.list" => Some(handle_notifications_list(state, req)),
        _ => None,
    }
}
