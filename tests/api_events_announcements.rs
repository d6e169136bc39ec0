//! Integration tests per gli endpoints di eventi e avvisi

mod common;

#[cfg(test)]
mod event_announcement_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    fn ids(items: &[Value], key: &str) -> Vec<i64> {
        items.iter().map(|i| i[key].as_i64().unwrap()).collect()
    }

    // ============================================================
    // Test per GET /api/events - list_events
    // ============================================================

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("staff", "families", "departments", "events")
    ))]
    async fn test_list_events_by_start(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server.get("/api/events").add_header(name, value).await;

        response.assert_status_ok();
        let events: Vec<Value> = response.json();
        assert_eq!(ids(&events, "event_id"), vec![1, 2, 3]);
        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("staff", "families", "departments", "events")
    ))]
    async fn test_list_events_filters(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .get("/api/events?from=2026-03-02T00:00:00Z&to=2026-12-31T00:00:00Z")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status_ok();
        let events: Vec<Value> = response.json();
        assert_eq!(ids(&events, "event_id"), vec![2, 3]);

        let response = server
            .get("/api/events?department_id=2")
            .add_header(name, value)
            .await;
        let events: Vec<Value> = response.json();
        assert_eq!(ids(&events, "event_id"), vec![3]);
        Ok(())
    }

    // ============================================================
    // Test per POST /api/events - create_event
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families", "departments")))]
    async fn test_create_event_sets_creator(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .post("/api/events")
            .add_header(name, value)
            .json(&json!({
                "title": "Cena comunitaria",
                "location": "Salone",
                "starts_at": "2026-06-06T19:00:00Z",
                "ends_at": "2026-06-06T22:00:00Z",
                "department_id": 2
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let event: Value = response.json();
        assert_eq!(event["title"], "Cena comunitaria");
        assert_eq!(event["created_by"], STAFF_ID);
        assert_eq!(event["department_id"], 2);
        assert_eq!(event["starts_at"], "2026-06-06T19:00:00Z");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families", "departments")))]
    async fn test_create_event_invalid_requests(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        // fine prima dell'inizio
        let response = server
            .post("/api/events")
            .add_header(name.clone(), value.clone())
            .json(&json!({
                "title": "Al contrario",
                "starts_at": "2026-06-06T19:00:00Z",
                "ends_at": "2026-06-06T18:00:00Z"
            }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid date range");

        let response = server
            .post("/api/events")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "title": "", "starts_at": "2026-06-06T19:00:00Z" }))
            .await;
        response.assert_status_bad_request();

        let response = server
            .post("/api/events")
            .add_header(name, value)
            .json(&json!({
                "title": "Reparto fantasma",
                "starts_at": "2026-06-06T19:00:00Z",
                "department_id": 999
            }))
            .await;
        response.assert_status_not_found();
        Ok(())
    }

    // ============================================================
    // Test per GET/PUT/DELETE /api/events/{id}
    // ============================================================

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("staff", "families", "departments", "events")
    ))]
    async fn test_get_event(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server.get("/api/events/3").add_header(name.clone(), value.clone()).await;
        response.assert_status_ok();
        let event: Value = response.json();
        assert_eq!(event["title"], "Campo giovani");
        assert_eq!(event["location"], "Valle di Susa");

        let response = server.get("/api/events/999").add_header(name, value).await;
        response.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("staff", "families", "departments", "events")
    ))]
    async fn test_update_event(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .put("/api/events/1")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "location": "Sala piccola", "ends_at": "2026-03-01T13:00:00Z" }))
            .await;
        response.assert_status_ok();
        let event: Value = response.json();
        assert_eq!(event["location"], "Sala piccola");
        assert_eq!(event["title"], "Culto domenicale");
        assert_eq!(event["ends_at"], "2026-03-01T13:00:00Z");

        let response = server
            .put("/api/events/999")
            .add_header(name, value)
            .json(&json!({ "title": "Nessuno" }))
            .await;
        response.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("staff", "families", "departments", "events")
    ))]
    async fn test_update_event_range_checked_on_merged_values(
        pool: SqlitePool,
    ) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        // il nuovo inizio supera la fine già salvata (12:00)
        let response = server
            .put("/api/events/1")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "starts_at": "2026-03-01T14:00:00Z" }))
            .await;
        response.assert_status_bad_request();

        // l'evento non è stato modificato
        let response = server.get("/api/events/1").add_header(name, value).await;
        let event: Value = response.json();
        assert_eq!(event["starts_at"], "2026-03-01T10:00:00Z");
        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("staff", "families", "departments", "events")
    ))]
    async fn test_delete_event(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server.delete("/api/events/2").add_header(name.clone(), value.clone()).await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = server.delete("/api/events/2").add_header(name, value).await;
        response.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("staff", "families", "departments", "events")
    ))]
    async fn test_deleting_department_detaches_events(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        server
            .delete("/api/departments/1")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let response = server.get("/api/events/2").add_header(name, value).await;
        response.assert_status_ok();
        let event: Value = response.json();
        assert!(event["department_id"].is_null());
        Ok(())
    }

    // ============================================================
    // Test per GET /api/announcements - list_announcements
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "announcements")))]
    async fn test_list_announcements_pinned_first_without_expired(
        pool: SqlitePool,
    ) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server.get("/api/announcements").add_header(name, value).await;

        response.assert_status_ok();
        let announcements: Vec<Value> = response.json();
        assert_eq!(ids(&announcements, "announcement_id"), vec![1, 4, 2]);
        assert_eq!(announcements[0]["is_pinned"], true);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "announcements")))]
    async fn test_list_announcements_include_expired(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .get("/api/announcements?include_expired=true")
            .add_header(name, value)
            .await;

        response.assert_status_ok();
        let announcements: Vec<Value> = response.json();
        assert_eq!(ids(&announcements, "announcement_id"), vec![1, 4, 2, 3]);
        Ok(())
    }

    // ============================================================
    // Test per POST /api/announcements - create_announcement
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "announcements")))]
    async fn test_create_announcement(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = bearer(PASTOR_ID, "pastore");

        let response = server
            .post("/api/announcements")
            .add_header(name.clone(), value.clone())
            .json(&json!({
                "title": "Battesimi",
                "content": "Iscrizioni aperte per i battesimi di giugno.",
                "author_id": 1
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let announcement: Value = response.json();
        assert_eq!(announcement["author_id"], PASTOR_ID);
        assert_eq!(announcement["is_pinned"], false);
        assert!(announcement["published_at"].is_string());
        assert!(announcement["expires_at"].is_null());

        // pubblicato adesso: compare in cima ai non fissati
        let response = server.get("/api/announcements").add_header(name, value).await;
        let announcements: Vec<Value> = response.json();
        assert_eq!(announcements.len(), 4);
        assert_eq!(announcements[1]["title"], "Battesimi");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff")))]
    async fn test_create_announcement_empty_content(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .post("/api/announcements")
            .add_header(name, value)
            .json(&json!({ "title": "Vuoto", "content": "" }))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    // ============================================================
    // Test per GET/PUT/DELETE /api/announcements/{id}
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "announcements")))]
    async fn test_get_announcement(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        // anche scaduto resta leggibile per id
        let response = server
            .get("/api/announcements/3")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status_ok();
        let announcement: Value = response.json();
        assert_eq!(announcement["title"], "Vecchio avviso");

        let response = server.get("/api/announcements/999").add_header(name, value).await;
        response.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "announcements")))]
    async fn test_update_announcement_pin(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .put("/api/announcements/2")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "is_pinned": true }))
            .await;
        response.assert_status_ok();
        let announcement: Value = response.json();
        assert_eq!(announcement["is_pinned"], true);
        assert_eq!(announcement["title"], "Raccolta alimentare");

        // i fissati in ordine di pubblicazione decrescente
        let response = server
            .get("/api/announcements")
            .add_header(name.clone(), value.clone())
            .await;
        let announcements: Vec<Value> = response.json();
        assert_eq!(ids(&announcements, "announcement_id"), vec![2, 1, 4]);

        let response = server
            .put("/api/announcements/999")
            .add_header(name, value)
            .json(&json!({ "is_pinned": true }))
            .await;
        response.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "announcements")))]
    async fn test_delete_announcement(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .delete("/api/announcements/4")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = server.delete("/api/announcements/4").add_header(name, value).await;
        response.assert_status_not_found();
        Ok(())
    }
}
