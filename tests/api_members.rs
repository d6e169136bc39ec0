//! Integration tests per gli endpoints dei membri

mod common;

#[cfg(test)]
mod member_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

    fn picture_form(bytes: Vec<u8>, mime: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(bytes).file_name("foto.png").mime_type(mime),
        )
    }

    // ============================================================
    // Test per GET /api/members - list_members
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_list_members_ordered(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server.get("/api/members").add_header(name, value).await;

        response.assert_status_ok();
        let members: Vec<Value> = response.json();
        assert_eq!(members.len(), 6);
        assert_eq!(members[0]["last_name"], "Bianchi");
        assert_eq!(members[1]["last_name"], "Neri");
        assert_eq!(members[2]["first_name"], "Laura");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_list_unassigned_members(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .get("/api/members?unassigned=true")
            .add_header(name, value)
            .await;

        response.assert_status_ok();
        let members: Vec<Value> = response.json();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["first_name"], "Paolo");
        assert!(members[0]["family_id"].is_null());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_list_members_filters(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .get("/api/members?family_id=1&search=lau")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status_ok();
        let members: Vec<Value> = response.json();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["first_name"], "Laura");

        let response = server
            .get("/api/members?status=Newcomer")
            .add_header(name.clone(), value.clone())
            .await;
        let members: Vec<Value> = response.json();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["status"], "Newcomer");

        // ricerca su nome completo
        let response = server
            .get("/api/members?search=Mario%20Rossi")
            .add_header(name, value)
            .await;
        let members: Vec<Value> = response.json();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["member_id"], 1);
        Ok(())
    }

    // ============================================================
    // Test per CRUD /api/members
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_get_member(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server.get("/api/members/4").add_header(name, value).await;

        response.assert_status_ok();
        let member: Value = response.json();
        assert_eq!(member["first_name"], "Giulia");
        assert_eq!(member["family_id"], 2);
        assert_eq!(member["baptized"], true);
        assert!(member["profile_picture_url"].is_null());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_get_member_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server.get("/api/members/999").add_header(name, value).await;

        response.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_create_member(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .post("/api/members")
            .add_header(name, value)
            .json(&json!({
                "family_id": 2,
                "first_name": "Marco",
                "last_name": "Bianchi",
                "gender": "Male",
                "birth_date": "2015-05-05",
                "relationship": "Child"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let member: Value = response.json();
        assert_eq!(member["family_id"], 2);
        assert_eq!(member["status"], "Active");
        assert_eq!(member["baptized"], false);
        assert_eq!(member["birth_date"], "2015-05-05");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_create_member_unknown_family(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .post("/api/members")
            .add_header(name, value)
            .json(&json!({ "family_id": 999, "first_name": "Marco", "last_name": "Blu" }))
            .await;

        response.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_create_member_invalid_email(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .post("/api/members")
            .add_header(name, value)
            .json(&json!({ "first_name": "Marco", "last_name": "Blu", "email": "non-una-email" }))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_update_member(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .put("/api/members/5")
            .add_header(name, value)
            .json(&json!({ "status": "Active", "baptized": true, "baptism_date": "2026-04-05" }))
            .await;

        response.assert_status_ok();
        let member: Value = response.json();
        assert_eq!(member["status"], "Active");
        assert_eq!(member["baptized"], true);
        assert_eq!(member["baptism_date"], "2026-04-05");
        assert_eq!(member["first_name"], "Paolo");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_update_member_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .put("/api/members/999")
            .add_header(name, value)
            .json(&json!({ "first_name": "Nessuno" }))
            .await;

        response.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families", "departments")))]
    async fn test_delete_member_removes_team_memberships(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));
        let (name, value) = staff_auth();

        let response = server
            .delete("/api/members/2")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = server.get("/api/members/2").add_header(name, value).await;
        response.assert_status_not_found();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM team_members WHERE member_id = 2")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 0);
        Ok(())
    }

    // ============================================================
    // Test per PATCH /api/members/{id}/family - assign_family
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_assign_member_to_family(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .patch("/api/members/5/family")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "family_id": 2, "relationship": "Sibling" }))
            .await;

        response.assert_status_ok();
        let member: Value = response.json();
        assert_eq!(member["family_id"], 2);
        assert_eq!(member["relationship"], "Sibling");

        let response = server.get("/api/families/2").add_header(name, value).await;
        let family: Value = response.json();
        assert_eq!(family["members"].as_array().unwrap().len(), 2);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_detach_member_from_family(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .patch("/api/members/3/family")
            .add_header(name, value)
            .json(&json!({ "family_id": null }))
            .await;

        response.assert_status_ok();
        let member: Value = response.json();
        assert!(member["family_id"].is_null());
        assert!(member["relationship"].is_null());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_assign_family_requires_family_id(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        // chiave assente o scritta male: nessuno spostamento
        for body in [json!({}), json!({ "familyId": 2 })] {
            let response = server
                .patch("/api/members/1/family")
                .add_header(name.clone(), value.clone())
                .json(&body)
                .await;
            response.assert_status_bad_request();
            let error: Value = response.json();
            assert_eq!(error["error"], "Missing family_id");
        }

        let response = server.get("/api/members/1").add_header(name.clone(), value.clone()).await;
        let member: Value = response.json();
        assert_eq!(member["family_id"], 1);
        assert_eq!(member["relationship"], "Head");

        let response = server.get("/api/families/1").add_header(name, value).await;
        let family: Value = response.json();
        assert_eq!(family["members"].as_array().unwrap().len(), 3);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_member_notes_too_long(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();
        let notes = "x".repeat(2001);

        let response = server
            .post("/api/members")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "first_name": "Nota", "last_name": "Lunga", "notes": notes }))
            .await;
        response.assert_status_bad_request();

        let response = server
            .put("/api/members/1")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "notes": notes }))
            .await;
        response.assert_status_bad_request();

        let response = server
            .put("/api/families/1")
            .add_header(name, value)
            .json(&json!({ "notes": notes }))
            .await;
        response.assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_assign_member_unknown_family(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .patch("/api/members/5/family")
            .add_header(name, value)
            .json(&json!({ "family_id": 999 }))
            .await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["error"], "Family not found");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_assign_unknown_member(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server
            .patch("/api/members/999/family")
            .add_header(name, value)
            .json(&json!({ "family_id": 1 }))
            .await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["error"], "Member not found");
        Ok(())
    }

    // ============================================================
    // Test per GET /api/members/{id}/teams - list_member_teams
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families", "departments")))]
    async fn test_member_teams(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = staff_auth();

        let response = server.get("/api/members/1/teams").add_header(name, value).await;

        response.assert_status_ok();
        let teams: Vec<Value> = response.json();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0]["team_name"], "Coro");
        assert_eq!(teams[0]["department_name"], "Musica");
        assert_eq!(teams[0]["role"], "Leader");
        Ok(())
    }

    // ============================================================
    // Test per /api/members/{id}/picture
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_upload_member_picture(pool: SqlitePool) -> sqlx::Result<()> {
        let upload_dir = tempfile::tempdir().expect("tempdir");
        let state = create_test_state_with_uploads(pool, upload_dir.path());
        let server = create_test_server(state);
        let (name, value) = staff_auth();

        let response = server
            .post("/api/members/1/picture")
            .add_header(name.clone(), value.clone())
            .multipart(picture_form(PNG_BYTES.to_vec(), "image/png"))
            .await;

        response.assert_status_ok();
        let member: Value = response.json();
        let url = member["profile_picture_url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let stored_name = url.trim_start_matches("/uploads/");
        let on_disk = std::fs::read(upload_dir.path().join(stored_name)).expect("file saved");
        assert_eq!(on_disk, PNG_BYTES);

        // il file è servito sotto /uploads
        let response = server.get(&url).await;
        response.assert_status_ok();
        assert_eq!(response.as_bytes().as_ref(), PNG_BYTES);

        // una nuova foto sostituisce e cancella la precedente
        let response = server
            .post("/api/members/1/picture")
            .add_header(name, value)
            .multipart(picture_form(b"GIF89a-second".to_vec(), "image/gif"))
            .await;
        response.assert_status_ok();
        let member: Value = response.json();
        assert!(member["profile_picture_url"].as_str().unwrap().ends_with(".gif"));
        assert!(!upload_dir.path().join(stored_name).exists());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_upload_rejects_unsupported_type(pool: SqlitePool) -> sqlx::Result<()> {
        let upload_dir = tempfile::tempdir().expect("tempdir");
        let state = create_test_state_with_uploads(pool, upload_dir.path());
        let server = create_test_server(state);
        let (name, value) = staff_auth();

        let response = server
            .post("/api/members/1/picture")
            .add_header(name, value)
            .multipart(picture_form(b"%PDF-1.7".to_vec(), "application/pdf"))
            .await;

        response.assert_status_bad_request();
        assert_eq!(std::fs::read_dir(upload_dir.path()).unwrap().count(), 0);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_upload_rejects_empty_file(pool: SqlitePool) -> sqlx::Result<()> {
        let upload_dir = tempfile::tempdir().expect("tempdir");
        let state = create_test_state_with_uploads(pool, upload_dir.path());
        let server = create_test_server(state);
        let (name, value) = staff_auth();

        let response = server
            .post("/api/members/1/picture")
            .add_header(name, value)
            .multipart(picture_form(Vec::new(), "image/png"))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_upload_rejects_large_file(pool: SqlitePool) -> sqlx::Result<()> {
        let upload_dir = tempfile::tempdir().expect("tempdir");
        let state = create_test_state_with_uploads(pool, upload_dir.path());
        let server = create_test_server(state);
        let (name, value) = staff_auth();

        let response = server
            .post("/api/members/1/picture")
            .add_header(name, value)
            .multipart(picture_form(vec![0u8; TEST_MAX_UPLOAD_BYTES + 1], "image/png"))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_upload_without_file_field(pool: SqlitePool) -> sqlx::Result<()> {
        let upload_dir = tempfile::tempdir().expect("tempdir");
        let state = create_test_state_with_uploads(pool, upload_dir.path());
        let server = create_test_server(state);
        let (name, value) = staff_auth();

        let response = server
            .post("/api/members/1/picture")
            .add_header(name, value)
            .multipart(MultipartForm::new().add_text("note", "niente file"))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_upload_picture_unknown_member(pool: SqlitePool) -> sqlx::Result<()> {
        let upload_dir = tempfile::tempdir().expect("tempdir");
        let state = create_test_state_with_uploads(pool, upload_dir.path());
        let server = create_test_server(state);
        let (name, value) = staff_auth();

        let response = server
            .post("/api/members/999/picture")
            .add_header(name, value)
            .multipart(picture_form(PNG_BYTES.to_vec(), "image/png"))
            .await;

        response.assert_status_not_found();
        assert_eq!(std::fs::read_dir(upload_dir.path()).unwrap().count(), 0);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("staff", "families")))]
    async fn test_delete_member_picture(pool: SqlitePool) -> sqlx::Result<()> {
        let upload_dir = tempfile::tempdir().expect("tempdir");
        let state = create_test_state_with_uploads(pool, upload_dir.path());
        let server = create_test_server(state);
        let (name, value) = staff_auth();

        server
            .post("/api/members/4/picture")
            .add_header(name.clone(), value.clone())
            .multipart(picture_form(PNG_BYTES.to_vec(), "image/png"))
            .await
            .assert_status_ok();
        assert_eq!(std::fs::read_dir(upload_dir.path()).unwrap().count(), 1);

        let response = server
            .delete("/api/members/4/picture")
            .add_header(name, value)
            .await;

        response.assert_status_ok();
        let member: Value = response.json();
        assert!(member["profile_picture_url"].is_null());
        assert_eq!(std::fs::read_dir(upload_dir.path()).unwrap().count(), 0);
        Ok(())
    }
}
