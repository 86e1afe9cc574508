mod common;

use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use common::{
    authed, create_project, create_task, init_app, memory_store, register, register_admin, send,
};

#[actix_rt::test]
async fn test_project_crud() {
    let app = init_app(memory_store()).await;
    let (token, user_id) = register(&app, "alice").await;

    let req = authed(
        test::TestRequest::post()
            .uri("/api/projects")
            .set_json(json!({ "name": "Website", "description": "Relaunch" })),
        &token,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Website");
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["owner_id"], user_id.to_string());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = authed(test::TestRequest::get().uri(&format!("/api/projects/{}", id)), &token);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Relaunch");

    let req = authed(
        test::TestRequest::put()
            .uri(&format!("/api/projects/{}", id))
            .set_json(json!({ "name": "Website v2" })),
        &token,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Website v2");
    assert_eq!(body["data"]["status"], "active");
    assert!(body["data"]["description"].is_null());

    let req = authed(test::TestRequest::get().uri("/api/projects"), &token);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = authed(test::TestRequest::delete().uri(&format!("/api/projects/{}", id)), &token);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let req = authed(test::TestRequest::get().uri(&format!("/api/projects/{}", id)), &token);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_project_validation() {
    let app = init_app(memory_store()).await;
    let (token, _) = register(&app, "alice").await;

    let cases = [
        (json!({ "name": "" }), StatusCode::BAD_REQUEST),
        (json!({ "name": "   " }), StatusCode::BAD_REQUEST),
        (json!({ "name": "a".repeat(101) }), StatusCode::UNPROCESSABLE_ENTITY),
        (json!({ "name": "P", "status": "" }), StatusCode::UNPROCESSABLE_ENTITY),
    ];
    for (payload, expected) in cases {
        let req = authed(
            test::TestRequest::post().uri("/api/projects").set_json(&payload),
            &token,
        );
        let (status, body) = send(&app, req).await;
        assert_eq!(status, expected, "payload {}: {}", payload, body);
    }

    let project = create_project(&app, &token, "Website").await;
    let req = authed(
        test::TestRequest::put()
            .uri(&format!("/api/projects/{}", project))
            .set_json(json!({ "name": "" })),
        &token,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Project name is required");

    let req = authed(
        test::TestRequest::post()
            .uri("/api/projects")
            .set_json(json!({ "description": "no name" })),
        &token,
    );
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_foreign_project_is_forbidden_and_missing_is_not_found() {
    let app = init_app(memory_store()).await;
    let (alice, _) = register(&app, "alice").await;
    let (bob, _) = register(&app, "bob").await;
    let project = create_project(&app, &alice, "Private").await;
    let uri = format!("/api/projects/{}", project);

    let requests = [
        test::TestRequest::get().uri(&uri),
        test::TestRequest::put().uri(&uri).set_json(json!({ "name": "Mine now" })),
        test::TestRequest::delete().uri(&uri),
        test::TestRequest::get().uri(&format!("{}/tasks", uri)),
    ];
    for req in requests {
        let (status, body) = send(&app, authed(req, &bob)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Forbidden");
    }

    let missing = format!("/api/projects/{}", Uuid::new_v4());
    let (status, _) = send(&app, authed(test::TestRequest::get().uri(&missing), &bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/projects/not-a-uuid"), &bob),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Still intact for its owner.
    let (status, body) = send(&app, authed(test::TestRequest::get().uri(&uri), &alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Private");
}

#[actix_rt::test]
async fn test_admin_sees_and_manages_every_project() {
    let store = memory_store();
    let app = init_app(store.clone()).await;
    let (alice, _) = register(&app, "alice").await;
    let (bob, _) = register(&app, "bob").await;
    let admin = register_admin(&app, &store, "root").await;

    let alice_project = create_project(&app, &alice, "A").await;
    create_project(&app, &bob, "B").await;

    let (_, body) = send(&app, authed(test::TestRequest::get().uri("/api/projects"), &alice)).await;
    let names: Vec<_> = body["data"].as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
    assert_eq!(names, vec![json!("A")]);

    let (_, body) = send(&app, authed(test::TestRequest::get().uri("/api/projects"), &admin)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let req = authed(
        test::TestRequest::put()
            .uri(&format!("/api/projects/{}", alice_project))
            .set_json(json!({ "name": "A (archived)", "status": "archived" })),
        &admin,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "archived");
}

#[actix_rt::test]
async fn test_project_tasks_and_cascading_delete() {
    let app = init_app(memory_store()).await;
    let (alice, _) = register(&app, "alice").await;
    let project = create_project(&app, &alice, "Doomed").await;
    let other = create_project(&app, &alice, "Kept").await;
    let task = create_task(&app, &alice, project, "Goes away").await;
    create_task(&app, &alice, other, "Stays").await;

    let req = authed(
        test::TestRequest::get().uri(&format!("/api/projects/{}/tasks", project)),
        &alice,
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body["data"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], task.to_string());

    let req = authed(
        test::TestRequest::delete().uri(&format!("/api/projects/{}", project)),
        &alice,
    );
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = authed(test::TestRequest::get().uri(&format!("/api/tasks/{}", task)), &alice);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, authed(test::TestRequest::get().uri("/api/tasks"), &alice)).await;
    let titles: Vec<_> = body["data"].as_array().unwrap().iter().map(|t| t["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Stays")]);
}
