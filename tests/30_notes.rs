mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn note_round_trip() -> Result<()> {
    let app = common::TestApp::new();
    let token = app.signup("ada").await?;
    let math = app.create_subject(&token, "Math").await?;

    let (status, created) = app
        .post(
            "/notes/create",
            &token,
            json!({ "title": "Ch1", "content": "Limits and continuity", "subject_id": math }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["create_at"].is_string());
    let id = created["id"].as_i64().expect("id");

    let (status, fetched) = app.get(&format!("/notes/get_note/{}", id), &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Ch1");
    assert_eq!(fetched["content"], "Limits and continuity");
    assert_eq!(fetched["subject_id"], math);
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn create_requires_an_owned_subject() -> Result<()> {
    let app = common::TestApp::new();
    let ada = app.signup("ada").await?;
    let grace = app.signup("grace").await?;
    let math = app.create_subject(&ada, "Math").await?;

    let (status, body) = app
        .post(
            "/notes/create",
            &grace,
            json!({ "title": "Sneaky", "content": "", "subject_id": math }),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Subject not Found");

    let (status, _) = app
        .post(
            "/notes/create",
            &ada,
            json!({ "title": "Nowhere", "content": "", "subject_id": 9999 }),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn notes_are_isolated_between_users() -> Result<()> {
    let app = common::TestApp::new();
    let ada = app.signup("ada").await?;
    let grace = app.signup("grace").await?;
    let math = app.create_subject(&ada, "Math").await?;
    let note = app.create_note(&ada, math, "Ch1").await?;
    let art = app.create_subject(&grace, "Art").await?;
    app.create_note(&grace, art, "Colour").await?;

    let (_, listed) = app.get("/notes/get", &grace).await?;
    assert!(listed
        .as_array()
        .expect("array")
        .iter()
        .all(|n| n["subject_id"] == art));

    let (status, _) = app.get(&format!("/notes/get_note/{}", note), &grace).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(
            &format!("/notes/update/{}", note),
            &grace,
            json!({ "title": "Mine", "content": "", "subject_id": art }),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/notes/delete/{}", note), &grace).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, fetched) = app.get(&format!("/notes/get_note/{}", note), &ada).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Ch1");
    Ok(())
}

#[tokio::test]
async fn update_overwrites_and_can_move_between_own_subjects() -> Result<()> {
    let app = common::TestApp::new();
    let token = app.signup("ada").await?;
    let math = app.create_subject(&token, "Math").await?;
    let physics = app.create_subject(&token, "Physics").await?;
    let note = app.create_note(&token, math, "Ch1").await?;

    let (status, updated) = app
        .put(
            &format!("/notes/update/{}", note),
            &token,
            json!({ "title": "Kinematics", "content": "v = u + at", "subject_id": physics }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(updated["id"], note);
    assert_eq!(updated["title"], "Kinematics");
    assert_eq!(updated["content"], "v = u + at");
    assert_eq!(updated["subject_id"], physics);
    Ok(())
}

#[tokio::test]
async fn moving_a_note_to_a_foreign_subject_fails_and_changes_nothing() -> Result<()> {
    let app = common::TestApp::new();
    let ada = app.signup("ada").await?;
    let grace = app.signup("grace").await?;
    let math = app.create_subject(&ada, "Math").await?;
    let art = app.create_subject(&grace, "Art").await?;
    let note = app.create_note(&ada, math, "Ch1").await?;
    let (_, before) = app.get(&format!("/notes/get_note/{}", note), &ada).await?;

    let (status, body) = app
        .put(
            &format!("/notes/update/{}", note),
            &ada,
            json!({ "title": "Hijacked", "content": "x", "subject_id": art }),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Subject not Found");

    let (_, after) = app.get(&format!("/notes/get_note/{}", note), &ada).await?;
    assert_eq!(after, before);
    Ok(())
}

#[tokio::test]
async fn delete_note() -> Result<()> {
    let app = common::TestApp::new();
    let token = app.signup("ada").await?;
    let math = app.create_subject(&token, "Math").await?;
    let note = app.create_note(&token, math, "Ch1").await?;

    let (status, _) = app.delete(&format!("/notes/delete/{}", note), &token).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.delete(&format!("/notes/delete/{}", note), &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note not Found");

    // The subject survives its notes
    let (status, _) = app.get(&format!("/subjects/get_subject/{}", math), &token).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
