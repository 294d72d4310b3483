use std::sync::Arc;

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use taskboard_be::handlers;
use taskboard_be::models::priority::NewPriority;
use taskboard_be::models::project::NewProject;
use taskboard_be::models::status::NewStatus;
use taskboard_be::models::team_member::NewTeamMember;
use taskboard_be::storage::{MemoryStore, Store};

macro_rules! service {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::from($store.clone() as Arc<dyn Store>))
                .configure(handlers::configure),
        )
        .await
    };
}

struct Ids {
    project: i32,
    todo: i32,
    completed: i32,
    priority: i32,
    member: i32,
}

async fn lookups(store: &MemoryStore) -> Ids {
    let project = store
        .create_project(NewProject { name: "Apollo".into() })
        .await
        .unwrap();
    let todo = store
        .create_status(NewStatus { name: "Todo".into(), order: 1 })
        .await
        .unwrap();
    let completed = store
        .create_status(NewStatus { name: "Completed".into(), order: 2 })
        .await
        .unwrap();
    let priority = store
        .create_priority(NewPriority { name: "Critical".into(), order: 1 })
        .await
        .unwrap();
    let member = store
        .create_team_member(NewTeamMember { name: "Ann".into(), role: "Engineer".into() })
        .await
        .unwrap();
    Ids {
        project: project.id,
        todo: todo.id,
        completed: completed.id,
        priority: priority.id,
        member: member.id,
    }
}

fn task_body(ids: &Ids, title: &str) -> Value {
    json!({
        "title": title,
        "projectId": ids.project,
        "statusId": ids.todo,
        "priorityId": ids.priority,
        "assigneeId": ids.member
    })
}

#[actix_web::test]
async fn health_reports_store_counts() {
    let store = Arc::new(MemoryStore::new());
    lookups(&store).await;
    let app = service!(store);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["stats"]["statuses"], 2);
}

#[actix_web::test]
async fn team_member_lifecycle() {
    let store = Arc::new(MemoryStore::new());
    let app = service!(store);

    let req = test::TestRequest::post()
        .uri("/api/team-members")
        .set_json(json!({"name": "Sam", "role": "Designer"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Sam");
    assert!(created["createdAt"].is_string());

    let req = test::TestRequest::get().uri("/api/team-members").to_request();
    let all: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/team-members/{}", id))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/team-members/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/team-members/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Team member not found"}));
}

#[actix_web::test]
async fn blank_and_missing_fields_are_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = service!(store);

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .set_json(json!({"name": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("name"));

    let req = test::TestRequest::post()
        .uri("/api/team-members")
        .set_json(json!({"name": "Sam"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(store.stats().await.unwrap().projects, 0);
}

#[actix_web::test]
async fn malformed_json_and_bad_ids_are_400() {
    let store = Arc::new(MemoryStore::new());
    let app = service!(store);

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(ContentType::json())
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let req = test::TestRequest::get().uri("/api/tasks/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Invalid id"}));
}

#[actix_web::test]
async fn duplicate_project_name_is_400() {
    let store = Arc::new(MemoryStore::new());
    lookups(&store).await;
    let app = service!(store);

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .set_json(json!({"name": "Apollo"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("already exists"));
    assert_eq!(store.stats().await.unwrap().projects, 1);
}

#[actix_web::test]
async fn names_are_stored_exactly_as_sent() {
    let store = Arc::new(MemoryStore::new());
    lookups(&store).await;
    let app = service!(store);

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .set_json(json!({"name": "Apollo "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["name"], "Apollo ");

    let req = test::TestRequest::post()
        .uri("/api/team-members")
        .set_json(json!({"name": " Sam", "role": "Designer  "}))
        .to_request();
    let member: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(member["name"], " Sam");
    assert_eq!(member["role"], "Designer  ");

    let req = test::TestRequest::post()
        .uri("/api/statuses")
        .set_json(json!({"name": "\tTodo"}))
        .to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["name"], "\tTodo");
}

#[actix_web::test]
async fn referenced_rows_cannot_be_deleted() {
    let store = Arc::new(MemoryStore::new());
    let ids = lookups(&store).await;
    let app = service!(store);

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(task_body(&ids, "Launch"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    for uri in [
        format!("/api/projects/{}", ids.project),
        format!("/api/statuses/{}", ids.todo),
        format!("/api/priorities/{}", ids.priority),
        format!("/api/team-members/{}", ids.member),
    ] {
        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());

        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }

    // The unreferenced status can go.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/statuses/{}", ids.completed))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn task_with_dangling_reference_is_not_created() {
    let store = Arc::new(MemoryStore::new());
    let ids = lookups(&store).await;
    let app = service!(store);

    let mut body = task_body(&ids, "Orphan");
    body["projectId"] = json!(999);
    let req = test::TestRequest::post().uri("/api/tasks").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.stats().await.unwrap().tasks, 0);

    let mut body = task_body(&ids, "Zero");
    body["statusId"] = json!(0);
    let req = test::TestRequest::post().uri("/api/tasks").set_json(body).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn task_create_ignores_server_owned_fields() {
    let store = Arc::new(MemoryStore::new());
    let ids = lookups(&store).await;
    let app = service!(store);

    let mut body = task_body(&ids, "  Write docs ");
    body["id"] = json!(999);
    body["createdAt"] = json!("2000-01-01T00:00:00Z");
    body["completedAt"] = json!("2000-01-02T00:00:00Z");
    body["dueDate"] = json!("2030-05-01");
    let req = test::TestRequest::post().uri("/api/tasks").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;

    assert_eq!(created["id"], 1);
    assert_eq!(created["title"], "  Write docs ");
    assert_ne!(created["createdAt"], "2000-01-01T00:00:00Z");
    assert!(created["completedAt"].is_null());
    assert_eq!(created["dueDate"], "2030-05-01T00:00:00Z");

    let req = test::TestRequest::get().uri("/api/tasks/1").to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let mut body = task_body(&ids, "Bad date");
    body["dueDate"] = json!("next week");
    let req = test::TestRequest::post().uri("/api/tasks").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "dueDate must be an ISO-8601 date");
}

#[actix_web::test]
async fn patch_merges_and_clears_fields() {
    let store = Arc::new(MemoryStore::new());
    let ids = lookups(&store).await;
    let app = service!(store);

    let mut body = task_body(&ids, "Review PR");
    body["description"] = json!("Needs a second pair of eyes");
    let req = test::TestRequest::post().uri("/api/tasks").set_json(body).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::patch()
        .uri("/api/tasks/1")
        .set_json(json!({
            "description": null,
            "statusId": ids.completed,
            "completedAt": "2030-01-01T09:30:00Z"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;

    assert!(updated["description"].is_null());
    assert_eq!(updated["title"], "Review PR");
    assert_eq!(updated["statusId"], ids.completed);
    assert_eq!(updated["completedAt"], "2030-01-01T09:30:00Z");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    // Moving the status back does not touch completedAt.
    let req = test::TestRequest::patch()
        .uri("/api/tasks/1")
        .set_json(json!({"statusId": ids.todo}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["completedAt"], "2030-01-01T09:30:00Z");

    let req = test::TestRequest::patch()
        .uri("/api/tasks/1")
        .set_json(json!({"assigneeId": 42}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri("/api/tasks/77")
        .set_json(json!({"title": "Ghost"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Task not found"}));
}

#[actix_web::test]
async fn task_delete_is_204_even_when_absent() {
    let store = Arc::new(MemoryStore::new());
    let ids = lookups(&store).await;
    let app = service!(store);

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(task_body(&ids, "Temp"))
        .to_request();
    test::call_service(&app, req).await;

    for _ in 0..2 {
        let req = test::TestRequest::delete().uri("/api/tasks/1").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    }
    assert_eq!(store.stats().await.unwrap().tasks, 0);
}

#[actix_web::test]
async fn status_order_defaults_to_next_slot() {
    let store = Arc::new(MemoryStore::new());
    let app = service!(store);

    let req = test::TestRequest::post()
        .uri("/api/statuses")
        .set_json(json!({"name": "Todo"}))
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["order"], 1);

    let req = test::TestRequest::post()
        .uri("/api/statuses")
        .set_json(json!({"name": "Done", "order": 10}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/statuses")
        .set_json(json!({"name": "Review"}))
        .to_request();
    let third: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(third["order"], 11);

    let req = test::TestRequest::get().uri("/api/statuses").to_request();
    let all: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = all.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Todo", "Done", "Review"]);
}

#[actix_web::test]
async fn priority_order_defaults_to_next_slot() {
    let store = Arc::new(MemoryStore::new());
    let app = service!(store);

    let req = test::TestRequest::post()
        .uri("/api/priorities")
        .set_json(json!({"name": "Low"}))
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["order"], 1);

    let req = test::TestRequest::post()
        .uri("/api/priorities")
        .set_json(json!({"name": "High", "order": 7}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/priorities")
        .set_json(json!({"name": "Critical"}))
        .to_request();
    let third: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(third["order"], 8);
}

#[actix_web::test]
async fn default_order_past_i32_max_is_400() {
    let store = Arc::new(MemoryStore::new());
    let app = service!(store);

    for uri in ["/api/priorities", "/api/statuses"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(json!({"name": "Top", "order": i32::MAX}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(json!({"name": "Next"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("explicit order"));

        // An explicit order still works.
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(json!({"name": "Next", "order": 0}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }
}

#[actix_web::test]
async fn patch_with_blank_title_is_400() {
    let store = Arc::new(MemoryStore::new());
    let ids = lookups(&store).await;
    let app = service!(store);

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(task_body(&ids, "Keep me"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::patch()
        .uri("/api/tasks/1")
        .set_json(json!({"title": "  "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("title"));

    let req = test::TestRequest::get().uri("/api/tasks/1").to_request();
    let task: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(task["title"], "Keep me");
}

#[actix_web::test]
async fn reports_reflect_stored_tasks() {
    let store = Arc::new(MemoryStore::new());
    let ids = lookups(&store).await;
    let app = service!(store);

    for title in ["One", "Two"] {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(task_body(&ids, title))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/api/reports/aging").to_request();
    let aging: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(aging.len(), 7);
    assert_eq!(aging[0], json!({"range": "7", "count": 2}));

    let req = test::TestRequest::get().uri("/api/reports/workload").to_request();
    let workload: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(workload, json!([{"name": "Ann", "count": 2}]));

    let req = test::TestRequest::get().uri("/api/reports/priorities").to_request();
    let priorities: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(priorities[0], json!({"name": "Critical", "count": 2}));

    let req = test::TestRequest::get().uri("/api/reports/projects").to_request();
    let projects: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(projects[0]["name"], "Apollo");
    assert_eq!(projects[0]["health"], "On Track");

    let req = test::TestRequest::get()
        .uri(&format!("/api/reports/overview?assigneeId={}", ids.member))
        .to_request();
    let overview: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(overview["openTasks"], 2);
    assert_eq!(overview["criticalTasks"], 2);
    assert_eq!(overview["myOpenTasks"], 2);
    assert_eq!(overview["delegatedTasks"], 0);

    let req = test::TestRequest::get()
        .uri("/api/reports/tasks?status=Todo&assignee=all&sort=assignee&direction=desc")
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["project"], "Apollo");
    assert_eq!(rows[0]["overdue"], false);

    let req = test::TestRequest::get().uri("/api/reports/velocity").to_request();
    let velocity: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(velocity.len(), 30);
}

#[actix_web::test]
async fn reports_reject_unknown_query_values() {
    let store = Arc::new(MemoryStore::new());
    let app = service!(store);

    for uri in [
        "/api/reports/velocity?period=decade",
        "/api/reports/tasks?sort=title",
        "/api/reports/tasks?direction=sideways",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}
