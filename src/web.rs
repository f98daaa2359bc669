use actix_files::Files;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

use crate::parser::{parse_members_from_reader, validate_plan, RosterPlan};
use crate::roster::{
    roster_stats, shuffle, AvailabilityRecord, AvailabilityStore, EligibilityIndex, Event, Ledger,
    Member, Role, ShuffleMode, SlotKey,
};

/// Everything the server knows about the current roster period. One mutex
/// over the whole thing, so at most one shuffle run is in flight at a time
/// and a run always sees a consistent snapshot.
#[derive(Default)]
pub struct RosterState {
    pub members: Vec<Member>,
    pub roles: Vec<Role>,
    pub events: Vec<Event>,
    pub availability: AvailabilityStore,
    pub ledger: Ledger,
}

pub struct AppState {
    pub roster: Mutex<RosterState>,
    pub admin_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Deserialize)]
pub struct ShuffleRequest {
    mode: ShuffleMode,
}

#[derive(Deserialize)]
pub struct PinRequest {
    event_id: String,
    role_id: String,
    member_id: String,
}

#[derive(Deserialize)]
pub struct UnpinRequest {
    event_id: String,
    role_id: String,
}

#[derive(Serialize)]
pub struct RosterRow {
    event_id: String,
    event_name: String,
    date: NaiveDate,
    session: Option<String>,
    role_id: String,
    role_name: String,
    member_id: Option<String>,
    member: Option<String>,
    manual: bool,
    is_empty: bool,
}

/// Admin check: a logged-in session, or the password in the
/// `X-Admin-Password` header for scripted use.
fn authorized(req: &HttpRequest, session: &Session, state: &AppState) -> bool {
    if session.get::<bool>("admin").ok().flatten().unwrap_or(false) {
        return true;
    }
    let header = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    !state.admin_password.is_empty() && header == state.admin_password
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"}))
}

async fn admin_login(
    req: web::Json<LoginRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if req.password == state.admin_password {
        session.insert("admin", true)?;
        Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
    } else {
        Ok(HttpResponse::Unauthorized()
            .json(serde_json::json!({"success": false, "error": "Invalid password"})))
    }
}

// Bulk member import: the request body is the CSV itself.
async fn upload_members(
    req: HttpRequest,
    session: Session,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !authorized(&req, &session, &state) {
        return Ok(unauthorized());
    }

    match parse_members_from_reader(body.as_ref()) {
        Ok(import) => {
            let mut roster = state.roster.lock().unwrap();
            info!(members = import.members.len(), "member list replaced");
            roster.members = import.members;
            roster.availability = AvailabilityStore::from_records(import.availability);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "members": roster.members.len(),
            })))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to process CSV: {}", e)
        }))),
    }
}

// Replaces the roster plan (events + roles). Assignments whose slot no
// longer exists in the new plan are dropped.
async fn upload_plan(
    req: HttpRequest,
    session: Session,
    plan: web::Json<RosterPlan>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !authorized(&req, &session, &state) {
        return Ok(unauthorized());
    }

    if let Err(e) = validate_plan(&plan) {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": e.to_string()})));
    }

    let plan = plan.into_inner();
    let mut guard = state.roster.lock().unwrap();
    let roster = &mut *guard;
    roster.roles = plan.roles;
    roster.events = plan.events;
    let dropped = roster.ledger.retain_valid(&roster.events, &roster.roles);
    info!(
        events = roster.events.len(),
        roles = roster.roles.len(),
        dropped_assignments = dropped,
        "roster plan replaced"
    );
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "dropped_assignments": dropped,
    })))
}

async fn run_shuffle(
    req: HttpRequest,
    session: Session,
    body: web::Json<ShuffleRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !authorized(&req, &session, &state) {
        return Ok(unauthorized());
    }

    // The lock is held for the whole run: shuffles against one roster are
    // serialized, and the result is written back atomically.
    let mut roster = state.roster.lock().unwrap();
    let eligibility = EligibilityIndex::build(&roster.members);
    match shuffle(
        &roster.events,
        &roster.roles,
        &eligibility,
        &roster.availability,
        &roster.ledger,
        body.mode,
    ) {
        Ok(outcome) => {
            roster.ledger = outcome.ledger;
            let stats = roster_stats(&roster.ledger, &roster.events, &roster.roles);
            info!(filled = outcome.filled, mode = ?body.mode, "shuffle run finished");
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "filled": outcome.filled,
                "stats": stats,
            })))
        }
        Err(e) => Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": e.to_string()}))),
    }
}

async fn pin_assignment(
    req: HttpRequest,
    session: Session,
    body: web::Json<PinRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !authorized(&req, &session, &state) {
        return Ok(unauthorized());
    }

    let mut roster = state.roster.lock().unwrap();
    if !roster.events.iter().any(|e| e.id == body.event_id) {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": "Unknown event"})));
    }
    if !roster.roles.iter().any(|r| r.id == body.role_id) {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": "Unknown role"})));
    }
    if !roster.members.iter().any(|m| m.id == body.member_id) {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": "Unknown member"})));
    }

    roster
        .ledger
        .pin(SlotKey::new(&body.event_id, &body.role_id), &body.member_id);
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

async fn unpin_assignment(
    req: HttpRequest,
    session: Session,
    body: web::Json<UnpinRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !authorized(&req, &session, &state) {
        return Ok(unauthorized());
    }

    let mut roster = state.roster.lock().unwrap();
    let removed = roster
        .ledger
        .clear_slot(&SlotKey::new(&body.event_id, &body.role_id));
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "removed": removed.is_some(),
    })))
}

async fn clear_auto_assignments(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !authorized(&req, &session, &state) {
        return Ok(unauthorized());
    }

    let mut roster = state.roster.lock().unwrap();
    let (manual_only, removed) = roster.ledger.clear_auto();
    roster.ledger = manual_only;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "removed": removed,
    })))
}

async fn set_availability(
    req: HttpRequest,
    session: Session,
    body: web::Json<AvailabilityRecord>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !authorized(&req, &session, &state) {
        return Ok(unauthorized());
    }

    let mut roster = state.roster.lock().unwrap();
    if !roster.members.iter().any(|m| m.id == body.member_id) {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": "Unknown member"})));
    }
    roster.availability.insert(body.into_inner());
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

// Public read-only roster view: the full slot grid, gaps included.
async fn get_roster(state: web::Data<AppState>) -> Result<HttpResponse> {
    let roster = state.roster.lock().unwrap();

    let mut ordered: Vec<&Event> = roster.events.iter().collect();
    ordered.sort_by_key(|event| event.date);

    let mut rows = Vec::new();
    for event in ordered {
        for role in &roster.roles {
            let assignment = roster.ledger.get(&SlotKey::new(&event.id, &role.id));
            let member = assignment.and_then(|a| {
                roster
                    .members
                    .iter()
                    .find(|m| m.id == a.member_id)
                    .map(|m| crate::display::format_member_name(&m.team, &m.name))
            });
            rows.push(RosterRow {
                event_id: event.id.clone(),
                event_name: event.name.clone(),
                date: event.date,
                session: event.session.clone(),
                role_id: role.id.clone(),
                role_name: role.name.clone(),
                member_id: assignment.map(|a| a.member_id.clone()),
                member,
                manual: assignment.map(|a| a.manual).unwrap_or(false),
                is_empty: assignment.is_none(),
            });
        }
    }

    Ok(HttpResponse::Ok().json(rows))
}

async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let roster = state.roster.lock().unwrap();
    let stats = roster_stats(&roster.ledger, &roster.events, &roster.roles);
    Ok(HttpResponse::Ok().json(stats))
}

// HTML page handlers
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

async fn admin_page() -> Result<HttpResponse> {
    let html = include_str!("../templates/admin.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

pub async fn start_server(port: u16, admin_password: String) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState {
        roster: Mutex::new(RosterState::default()),
        admin_password,
    });
    let secret_key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .service(Files::new("/static", "static"))
            .route("/", web::get().to(index))
            .route("/admin", web::get().to(admin_page))
            .route("/api/login", web::post().to(admin_login))
            .route("/api/members/upload", web::post().to(upload_members))
            .route("/api/plan", web::post().to(upload_plan))
            .route("/api/shuffle", web::post().to(run_shuffle))
            .route("/api/assignments/pin", web::post().to(pin_assignment))
            .route("/api/assignments/unpin", web::post().to(unpin_assignment))
            .route("/api/assignments/clear_auto", web::post().to(clear_auto_assignments))
            .route("/api/availability", web::post().to(set_availability))
            .route("/api/roster", web::get().to(get_roster))
            .route("/api/stats", web::get().to(get_stats))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
