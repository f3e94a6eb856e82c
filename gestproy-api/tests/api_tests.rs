/// Integration tests for the GestProy API
///
/// Verify the end-to-end behavior of the core subsystem against a real
/// database: owner provisioning on project creation, singleton fixed-role
/// enforcement, fixed-role immutability, creator-only deletion, and
/// visibility rules.
///
/// Requires PostgreSQL; see tests/common/mod.rs for configuration.

mod common;

use axum::http::StatusCode;
use common::{create_test_user, send_expect, send_json, token_for, TestContext};
use gestproy_shared::models::miembro::Miembro;
use gestproy_shared::models::rol::{Rol, PRODUCT_OWNER, TECHNICAL_LEADER};
use serde_json::json;

/// Creates a project through the API and returns its id
async fn create_project(ctx: &TestContext, token: &str, nombre: &str) -> i64 {
    let body = send_expect(
        &ctx.app,
        "POST",
        "/proyectos",
        Some(token),
        Some(json!({ "nombre": nombre, "prioridad": "alta" })),
        StatusCode::CREATED,
    )
    .await;

    body["proyecto"]["id"].as_i64().expect("project id")
}

/// Looks up a seeded fixed role id by name
async fn fixed_role_id(ctx: &TestContext, nombre: &str) -> i64 {
    let roles: Vec<Rol> = sqlx::query_as(
        "SELECT id, proyecto_id, nombre, descripcion, es_fijo, fecha_creacion \
         FROM roles WHERE nombre = $1 AND es_fijo = TRUE",
    )
    .bind(nombre)
    .fetch_all(&ctx.db)
    .await
    .expect("role query");

    roles.first().expect("seeded fixed role").id
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let ctx = TestContext::new().await.unwrap();

    let response = send_json(&ctx.app, "GET", "/proyectos", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_project_provisions_product_owner() {
    let ctx = TestContext::new().await.unwrap();

    let body = send_expect(
        &ctx.app,
        "POST",
        "/proyectos",
        Some(&ctx.token),
        Some(json!({ "nombre": "Alpha", "prioridad": "alta" })),
        StatusCode::CREATED,
    )
    .await;

    // Default state is applied when unspecified
    assert_eq!(body["proyecto"]["estado"], "iniciado");
    assert_eq!(body["proyecto"]["creado_por"], ctx.user.id);

    let proyecto_id = body["proyecto"]["id"].as_i64().unwrap();

    // Exactly one membership: the creator as Product Owner
    let members = send_expect(
        &ctx.app,
        "GET",
        &format!("/miembros/proyecto/{}", proyecto_id),
        Some(&ctx.token),
        None,
        StatusCode::OK,
    )
    .await;

    let members = members.as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["usuario_id"], ctx.user.id);
    assert_eq!(members[0]["rol"]["nombre"], PRODUCT_OWNER);
    assert_eq!(members[0]["asignado_por"], ctx.user.id);
}

#[tokio::test]
async fn test_singleton_role_rejected_on_second_assignment() {
    let ctx = TestContext::new().await.unwrap();
    let proyecto_id = create_project(&ctx, &ctx.token, "Singleton").await;
    let po_id = fixed_role_id(&ctx, PRODUCT_OWNER).await;

    // Creator already holds Product Owner; assigning it to another user fails
    let other = create_test_user(&ctx.db, "Bob", "Lopez").await.unwrap();

    let body = send_expect(
        &ctx.app,
        "POST",
        "/miembros",
        Some(&ctx.token),
        Some(json!({
            "proyecto_id": proyecto_id,
            "usuario_id": other.id,
            "rol_id": po_id,
        })),
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert!(body["error"].as_str().unwrap().contains(PRODUCT_OWNER));

    // The membership count for that (project, role) pair is still 1
    let count = Miembro::count_by_rol(&ctx.db, proyecto_id, po_id)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_singleton_role_rejected_on_reassignment() {
    let ctx = TestContext::new().await.unwrap();
    let proyecto_id = create_project(&ctx, &ctx.token, "Reassign").await;
    let tl_id = fixed_role_id(&ctx, TECHNICAL_LEADER).await;

    // Two more members with custom roles
    let rol = send_expect(
        &ctx.app,
        "POST",
        "/roles",
        Some(&ctx.token),
        Some(json!({ "proyecto_id": proyecto_id, "nombre": "Developer" })),
        StatusCode::CREATED,
    )
    .await;
    let custom_rol_id = rol["rol"]["id"].as_i64().unwrap();

    let bob = create_test_user(&ctx.db, "Bob", "Lopez").await.unwrap();
    let carla = create_test_user(&ctx.db, "Carla", "Ruiz").await.unwrap();

    let bob_member = send_expect(
        &ctx.app,
        "POST",
        "/miembros",
        Some(&ctx.token),
        Some(json!({
            "proyecto_id": proyecto_id,
            "usuario_id": bob.id,
            "rol_id": custom_rol_id,
        })),
        StatusCode::CREATED,
    )
    .await;
    let bob_member_id = bob_member["miembro"]["id"].as_i64().unwrap();

    let carla_member = send_expect(
        &ctx.app,
        "POST",
        "/miembros",
        Some(&ctx.token),
        Some(json!({
            "proyecto_id": proyecto_id,
            "usuario_id": carla.id,
            "rol_id": custom_rol_id,
        })),
        StatusCode::CREATED,
    )
    .await;
    let carla_member_id = carla_member["miembro"]["id"].as_i64().unwrap();

    // Bob becomes Technical Leader
    send_expect(
        &ctx.app,
        "PUT",
        &format!("/miembros/{}", bob_member_id),
        Some(&ctx.token),
        Some(json!({ "rol_id": tl_id })),
        StatusCode::OK,
    )
    .await;

    // Carla cannot also become Technical Leader
    send_expect(
        &ctx.app,
        "PUT",
        &format!("/miembros/{}", carla_member_id),
        Some(&ctx.token),
        Some(json!({ "rol_id": tl_id })),
        StatusCode::BAD_REQUEST,
    )
    .await;

    // Bob keeping his own role is not a conflict
    send_expect(
        &ctx.app,
        "PUT",
        &format!("/miembros/{}", bob_member_id),
        Some(&ctx.token),
        Some(json!({ "rol_id": tl_id })),
        StatusCode::OK,
    )
    .await;
}

#[tokio::test]
async fn test_duplicate_member_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let proyecto_id = create_project(&ctx, &ctx.token, "Duplicates").await;

    let rol = send_expect(
        &ctx.app,
        "POST",
        "/roles",
        Some(&ctx.token),
        Some(json!({ "proyecto_id": proyecto_id, "nombre": "Tester" })),
        StatusCode::CREATED,
    )
    .await;
    let rol_id = rol["rol"]["id"].as_i64().unwrap();

    let bob = create_test_user(&ctx.db, "Bob", "Lopez").await.unwrap();

    send_expect(
        &ctx.app,
        "POST",
        "/miembros",
        Some(&ctx.token),
        Some(json!({
            "proyecto_id": proyecto_id,
            "usuario_id": bob.id,
            "rol_id": rol_id,
        })),
        StatusCode::CREATED,
    )
    .await;

    // Same (project, user) pair again, even with the same role
    send_expect(
        &ctx.app,
        "POST",
        "/miembros",
        Some(&ctx.token),
        Some(json!({
            "proyecto_id": proyecto_id,
            "usuario_id": bob.id,
            "rol_id": rol_id,
        })),
        StatusCode::BAD_REQUEST,
    )
    .await;
}

#[tokio::test]
async fn test_assign_member_requires_all_ids() {
    let ctx = TestContext::new().await.unwrap();

    for missing in ["proyecto_id", "usuario_id", "rol_id"] {
        let mut body = json!({
            "proyecto_id": 1,
            "usuario_id": 1,
            "rol_id": 1,
        });
        body.as_object_mut().unwrap().remove(missing);

        let response = send_expect(
            &ctx.app,
            "POST",
            "/miembros",
            Some(&ctx.token),
            Some(body),
            StatusCode::BAD_REQUEST,
        )
        .await;

        assert!(response["error"].as_str().unwrap().contains(missing));
    }
}

#[tokio::test]
async fn test_fixed_roles_are_immutable() {
    let ctx = TestContext::new().await.unwrap();
    let po_id = fixed_role_id(&ctx, PRODUCT_OWNER).await;

    // Update attempt
    send_expect(
        &ctx.app,
        "PUT",
        &format!("/roles/{}", po_id),
        Some(&ctx.token),
        Some(json!({ "nombre": "Renamed" })),
        StatusCode::FORBIDDEN,
    )
    .await;

    // Delete attempt
    send_expect(
        &ctx.app,
        "DELETE",
        &format!("/roles/{}", po_id),
        Some(&ctx.token),
        None,
        StatusCode::FORBIDDEN,
    )
    .await;

    // The stored row is unchanged
    let rol = Rol::find_by_id(&ctx.db, po_id).await.unwrap().unwrap();
    assert_eq!(rol.nombre, PRODUCT_OWNER);
    assert!(rol.es_fijo);
}

#[tokio::test]
async fn test_custom_role_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let proyecto_id = create_project(&ctx, &ctx.token, "Roles").await;

    // Missing nombre
    send_expect(
        &ctx.app,
        "POST",
        "/roles",
        Some(&ctx.token),
        Some(json!({ "proyecto_id": proyecto_id })),
        StatusCode::BAD_REQUEST,
    )
    .await;

    // Missing proyecto_id
    send_expect(
        &ctx.app,
        "POST",
        "/roles",
        Some(&ctx.token),
        Some(json!({ "nombre": "QA" })),
        StatusCode::BAD_REQUEST,
    )
    .await;

    let created = send_expect(
        &ctx.app,
        "POST",
        "/roles",
        Some(&ctx.token),
        Some(json!({ "proyecto_id": proyecto_id, "nombre": "QA" })),
        StatusCode::CREATED,
    )
    .await;
    let rol_id = created["rol"]["id"].as_i64().unwrap();
    assert_eq!(created["rol"]["es_fijo"], false);

    // Partial update: only descripcion changes
    let updated = send_expect(
        &ctx.app,
        "PUT",
        &format!("/roles/{}", rol_id),
        Some(&ctx.token),
        Some(json!({ "descripcion": "Quality assurance" })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["rol"]["nombre"], "QA");
    assert_eq!(updated["rol"]["descripcion"], "Quality assurance");

    // Listing with proyecto_id includes fixed and custom roles
    let roles = send_expect(
        &ctx.app,
        "GET",
        &format!("/roles?proyecto_id={}", proyecto_id),
        Some(&ctx.token),
        None,
        StatusCode::OK,
    )
    .await;
    let names: Vec<&str> = roles
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["nombre"].as_str().unwrap())
        .collect();
    assert!(names.contains(&PRODUCT_OWNER));
    assert!(names.contains(&TECHNICAL_LEADER));
    assert!(names.contains(&"QA"));

    // Listing without proyecto_id returns only fixed roles
    let fixed_only = send_expect(&ctx.app, "GET", "/roles", Some(&ctx.token), None, StatusCode::OK)
        .await;
    assert!(fixed_only
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["es_fijo"] == true));

    send_expect(
        &ctx.app,
        "DELETE",
        &format!("/roles/{}", rol_id),
        Some(&ctx.token),
        None,
        StatusCode::OK,
    )
    .await;

    send_expect(
        &ctx.app,
        "GET",
        &format!("/roles/{}", rol_id),
        Some(&ctx.token),
        None,
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[tokio::test]
async fn test_only_creator_can_delete_project() {
    let ctx = TestContext::new().await.unwrap();
    let proyecto_id = create_project(&ctx, &ctx.token, "Protected").await;

    let other = create_test_user(&ctx.db, "Mallory", "Paez").await.unwrap();
    let other_token = token_for(&other);

    send_expect(
        &ctx.app,
        "DELETE",
        &format!("/proyectos/{}", proyecto_id),
        Some(&other_token),
        None,
        StatusCode::FORBIDDEN,
    )
    .await;

    // Still there
    send_expect(
        &ctx.app,
        "GET",
        &format!("/proyectos/{}", proyecto_id),
        Some(&ctx.token),
        None,
        StatusCode::OK,
    )
    .await;

    send_expect(
        &ctx.app,
        "DELETE",
        &format!("/proyectos/{}", proyecto_id),
        Some(&ctx.token),
        None,
        StatusCode::OK,
    )
    .await;

    send_expect(
        &ctx.app,
        "GET",
        &format!("/proyectos/{}", proyecto_id),
        Some(&ctx.token),
        None,
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[tokio::test]
async fn test_project_visibility_is_union_without_duplicates() {
    let ctx = TestContext::new().await.unwrap();

    let alice = create_test_user(&ctx.db, "Alice", "Vega").await.unwrap();
    let alice_token = token_for(&alice);

    // Alice creates one project (she is creator AND member via auto-PO)
    let own_id = create_project(&ctx, &alice_token, "Owned").await;

    // She is added as a member of someone else's project
    let foreign_id = create_project(&ctx, &ctx.token, "Foreign").await;

    let rol = send_expect(
        &ctx.app,
        "POST",
        "/roles",
        Some(&ctx.token),
        Some(json!({ "proyecto_id": foreign_id, "nombre": "Analyst" })),
        StatusCode::CREATED,
    )
    .await;

    send_expect(
        &ctx.app,
        "POST",
        "/miembros",
        Some(&ctx.token),
        Some(json!({
            "proyecto_id": foreign_id,
            "usuario_id": alice.id,
            "rol_id": rol["rol"]["id"].as_i64().unwrap(),
        })),
        StatusCode::CREATED,
    )
    .await;

    let proyectos = send_expect(
        &ctx.app,
        "GET",
        "/proyectos",
        Some(&alice_token),
        None,
        StatusCode::OK,
    )
    .await;

    let ids: Vec<i64> = proyectos
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();

    // Exactly the union, each project once even when she is both creator
    // and member
    assert!(ids.contains(&own_id));
    assert!(ids.contains(&foreign_id));
    assert_eq!(
        ids.len(),
        ids.iter().collect::<std::collections::HashSet<_>>().len()
    );
}

#[tokio::test]
async fn test_membership_join_reflects_current_user_data() {
    let ctx = TestContext::new().await.unwrap();
    let proyecto_id = create_project(&ctx, &ctx.token, "JoinedRead").await;

    // Rename the user after the membership was created
    let new_token = token_for(&ctx.user);
    send_expect(
        &ctx.app,
        "PUT",
        &format!("/usuarios/{}", ctx.user.id),
        Some(&new_token),
        Some(json!({ "nombre": "Renamed" })),
        StatusCode::OK,
    )
    .await;

    let members = send_expect(
        &ctx.app,
        "GET",
        &format!("/miembros/proyecto/{}", proyecto_id),
        Some(&ctx.token),
        None,
        StatusCode::OK,
    )
    .await;

    // The joined display data is read-time, not a creation-time copy
    assert_eq!(members[0]["usuario"]["nombre"], "Renamed");
}

#[tokio::test]
async fn test_register_login_create_scenario() {
    let ctx = TestContext::new().await.unwrap();
    let correo = format!("scenario-{}@example.com", uuid::Uuid::new_v4());

    // Register
    let registered = send_expect(
        &ctx.app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "nombre": "Ana",
            "apellido": "Solis",
            "correo": correo,
            "contrasena": "Scenario-pass-1",
        })),
        StatusCode::CREATED,
    )
    .await;
    assert!(registered["access_token"].as_str().is_some());

    // Login
    let logged_in = send_expect(
        &ctx.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "correo": correo, "contrasena": "Scenario-pass-1" })),
        StatusCode::OK,
    )
    .await;
    let token = logged_in["access_token"].as_str().unwrap().to_string();
    let user_id = logged_in["usuario"]["id"].as_i64().unwrap();

    // Create project "Alpha" with priority "alta"
    let created = send_expect(
        &ctx.app,
        "POST",
        "/proyectos",
        Some(&token),
        Some(json!({ "nombre": "Alpha", "prioridad": "alta" })),
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["proyecto"]["estado"], "iniciado");
    let proyecto_id = created["proyecto"]["id"].as_i64().unwrap();

    // Exactly one member: Ana as Product Owner
    let members = send_expect(
        &ctx.app,
        "GET",
        &format!("/miembros/proyecto/{}", proyecto_id),
        Some(&token),
        None,
        StatusCode::OK,
    )
    .await;
    let members = members.as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["usuario_id"], user_id);
    assert_eq!(members[0]["rol"]["nombre"], PRODUCT_OWNER);

    // /auth/me resolves the caller
    let me = send_expect(&ctx.app, "GET", "/auth/me", Some(&token), None, StatusCode::OK).await;
    assert_eq!(me["id"], user_id);
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let ctx = TestContext::new().await.unwrap();
    let correo = format!("refresh-{}@example.com", uuid::Uuid::new_v4());

    let registered = send_expect(
        &ctx.app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "nombre": "Rafa",
            "apellido": "Nunez",
            "correo": correo,
            "contrasena": "Refresh-pass-1",
        })),
        StatusCode::CREATED,
    )
    .await;

    let refresh_token = registered["refresh_token"].as_str().unwrap();

    // A refresh token cannot be used as an access token
    let response = send_json(&ctx.app, "GET", "/auth/me", Some(refresh_token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // But it can be exchanged for a fresh access token
    let refreshed = send_expect(
        &ctx.app,
        "POST",
        "/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh_token })),
        StatusCode::OK,
    )
    .await;

    let access = refreshed["access_token"].as_str().unwrap();
    send_expect(&ctx.app, "GET", "/auth/me", Some(access), None, StatusCode::OK).await;
}

#[tokio::test]
async fn test_deactivated_account_cannot_login() {
    let ctx = TestContext::new().await.unwrap();
    let correo = format!("inactive-{}@example.com", uuid::Uuid::new_v4());

    send_expect(
        &ctx.app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "nombre": "Ines",
            "apellido": "Mora",
            "correo": correo,
            "contrasena": "Inactive-pass-1",
        })),
        StatusCode::CREATED,
    )
    .await;

    let logged_in = send_expect(
        &ctx.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "correo": correo, "contrasena": "Inactive-pass-1" })),
        StatusCode::OK,
    )
    .await;
    let token = logged_in["access_token"].as_str().unwrap().to_string();
    let user_id = logged_in["usuario"]["id"].as_i64().unwrap();

    // Self-deactivate
    send_expect(
        &ctx.app,
        "DELETE",
        &format!("/usuarios/{}", user_id),
        Some(&token),
        None,
        StatusCode::OK,
    )
    .await;

    send_expect(
        &ctx.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "correo": correo, "contrasena": "Inactive-pass-1" })),
        StatusCode::UNAUTHORIZED,
    )
    .await;
}

#[tokio::test]
async fn test_project_partial_update() {
    let ctx = TestContext::new().await.unwrap();
    let proyecto_id = create_project(&ctx, &ctx.token, "Patchable").await;

    let updated = send_expect(
        &ctx.app,
        "PUT",
        &format!("/proyectos/{}", proyecto_id),
        Some(&ctx.token),
        Some(json!({ "estado": "en_progreso", "fecha_inicio": "2024-08-01" })),
        StatusCode::OK,
    )
    .await;

    // Patched fields change, the rest stay
    assert_eq!(updated["proyecto"]["estado"], "en_progreso");
    assert_eq!(updated["proyecto"]["fecha_inicio"], "2024-08-01");
    assert_eq!(updated["proyecto"]["nombre"], "Patchable");
    assert_eq!(updated["proyecto"]["prioridad"], "alta");

    // Explicit null clears a nullable date
    let cleared = send_expect(
        &ctx.app,
        "PUT",
        &format!("/proyectos/{}", proyecto_id),
        Some(&ctx.token),
        Some(json!({ "fecha_inicio": null })),
        StatusCode::OK,
    )
    .await;
    assert!(cleared["proyecto"]["fecha_inicio"].is_null());
}

#[tokio::test]
async fn test_technique_assignment_unique_per_subprocess() {
    let ctx = TestContext::new().await.unwrap();
    let proyecto_id = create_project(&ctx, &ctx.token, "WorkItems").await;

    let proceso = send_expect(
        &ctx.app,
        "POST",
        "/procesos",
        Some(&ctx.token),
        Some(json!({ "proyecto_id": proyecto_id, "nombre": "Analisis" })),
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(proceso["proceso"]["estado"], "definido");
    let proceso_id = proceso["proceso"]["id"].as_i64().unwrap();

    let subproceso = send_expect(
        &ctx.app,
        "POST",
        "/subprocesos",
        Some(&ctx.token),
        Some(json!({
            "proceso_id": proceso_id,
            "nombre": "Entrevistas",
            "horas_estimadas": 12.5,
        })),
        StatusCode::CREATED,
    )
    .await;
    let subproceso_id = subproceso["subproceso"]["id"].as_i64().unwrap();
    assert_eq!(subproceso["subproceso"]["horas_estimadas"], 12.5);

    let tecnica = send_expect(
        &ctx.app,
        "POST",
        "/tecnicas",
        Some(&ctx.token),
        Some(json!({ "nombre": "Brainstorming", "categoria": "elicitacion" })),
        StatusCode::CREATED,
    )
    .await;
    let tecnica_id = tecnica["tecnica"]["id"].as_i64().unwrap();

    send_expect(
        &ctx.app,
        "POST",
        "/subproceso-tecnicas",
        Some(&ctx.token),
        Some(json!({ "subproceso_id": subproceso_id, "tecnica_id": tecnica_id })),
        StatusCode::CREATED,
    )
    .await;

    // Second assignment of the same pair fails
    send_expect(
        &ctx.app,
        "POST",
        "/subproceso-tecnicas",
        Some(&ctx.token),
        Some(json!({ "subproceso_id": subproceso_id, "tecnica_id": tecnica_id })),
        StatusCode::BAD_REQUEST,
    )
    .await;

    // The listing joins technique display data
    let asignaciones = send_expect(
        &ctx.app,
        "GET",
        &format!("/subproceso-tecnicas/subproceso/{}", subproceso_id),
        Some(&ctx.token),
        None,
        StatusCode::OK,
    )
    .await;
    let asignaciones = asignaciones.as_array().unwrap();
    assert_eq!(asignaciones.len(), 1);
    assert_eq!(asignaciones[0]["tecnica"]["nombre"], "Brainstorming");
}

#[tokio::test]
async fn test_technique_delete_is_soft() {
    let ctx = TestContext::new().await.unwrap();

    let tecnica = send_expect(
        &ctx.app,
        "POST",
        "/tecnicas",
        Some(&ctx.token),
        Some(json!({ "nombre": "Moscow", "categoria": "priorizacion" })),
        StatusCode::CREATED,
    )
    .await;
    let tecnica_id = tecnica["tecnica"]["id"].as_i64().unwrap();

    send_expect(
        &ctx.app,
        "DELETE",
        &format!("/tecnicas/{}", tecnica_id),
        Some(&ctx.token),
        None,
        StatusCode::OK,
    )
    .await;

    // Still fetchable, but inactive
    let fetched = send_expect(
        &ctx.app,
        "GET",
        &format!("/tecnicas/{}", tecnica_id),
        Some(&ctx.token),
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(fetched["activo"], false);
}

#[tokio::test]
async fn test_user_cannot_update_other_accounts() {
    let ctx = TestContext::new().await.unwrap();
    let other = create_test_user(&ctx.db, "Otro", "Usuario").await.unwrap();

    send_expect(
        &ctx.app,
        "PUT",
        &format!("/usuarios/{}", other.id),
        Some(&ctx.token),
        Some(json!({ "nombre": "Hacked" })),
        StatusCode::FORBIDDEN,
    )
    .await;
}
