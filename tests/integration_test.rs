//! Drives the client store against a real server instance bound to an
//! ephemeral port, covering the optimistic toggle reconcile/rollback paths.

use std::net::SocketAddr;

use taskforge::client::{ApiClient, FilterPatch, TaskStore};
use taskforge::models::{CreateTask, Priority, SortKey, SortOrder, StatusFilter, UpdateTask};
use taskforge::{create_router, test_utils};

async fn spawn_server() -> String {
    let state = test_utils::create_test_state().await;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn registered_client(base_url: &str) -> (ApiClient, String, String) {
    let email = format!("client_{}@example.com", uuid::Uuid::new_v4());
    let password = "Clientpassword1".to_string();

    let mut api = ApiClient::new(base_url.to_string());
    api.register(&email, &password, "Client User")
        .await
        .expect("Failed to register");

    (api, email, password)
}

#[tokio::test]
async fn test_register_login_and_me() {
    let base_url = spawn_server().await;
    let (api, email, password) = registered_client(&base_url).await;

    let me = api.me().await.expect("Failed to fetch profile");
    assert_eq!(me.email, email);

    let mut second = ApiClient::new(base_url.clone());
    second
        .login(&email, &password)
        .await
        .expect("Failed to log in");
    assert!(second.token().is_some());
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let base_url = spawn_server().await;
    let (_, email, _) = registered_client(&base_url).await;

    let mut api = ApiClient::new(base_url);
    let err = api
        .login(&email, "Wrongpassword1")
        .await
        .expect_err("Login should fail");

    assert_eq!(err.to_string(), "Invalid email or password");
}

#[tokio::test]
async fn test_store_create_and_fetch_with_filters() {
    let base_url = spawn_server().await;
    let (api, _, _) = registered_client(&base_url).await;
    let mut store = TaskStore::new(api);

    let low = CreateTask {
        title: "Low priority".to_string(),
        priority: Some(Priority::Low),
        ..Default::default()
    };
    let high = CreateTask {
        title: "High priority".to_string(),
        priority: Some(Priority::High),
        ..Default::default()
    };

    store.create_task(&low).await.expect("create failed");
    let high_task = store.create_task(&high).await.expect("create failed");
    assert_eq!(store.total, 2);
    assert!(store.error.is_none());

    // Complete one task, then narrow the view to completed only.
    store.toggle_completion(high_task.id).await;

    store
        .set_filters(FilterPatch {
            status: Some(StatusFilter::Completed),
            sort_by: Some(SortKey::Priority),
            sort_order: Some(SortOrder::Asc),
            ..Default::default()
        })
        .await;

    assert_eq!(store.total, 1);
    assert_eq!(store.tasks.len(), 1);
    assert_eq!(store.tasks[0].title, "High priority");

    store.reset_filters().await;
    assert_eq!(store.total, 2);
}

#[tokio::test]
async fn test_optimistic_toggle_reconciles_with_server() {
    let base_url = spawn_server().await;
    let (api, _, _) = registered_client(&base_url).await;
    let mut store = TaskStore::new(api);

    let input = CreateTask {
        title: "Optimistic".to_string(),
        ..Default::default()
    };
    let task = store.create_task(&input).await.expect("create failed");
    assert!(!task.completed);

    let toggled = store
        .toggle_completion(task.id)
        .await
        .expect("toggle failed");
    assert!(toggled.completed);
    assert!(store.tasks[0].completed);
    assert!(store.error.is_none());

    // The local copy matches what the server now holds.
    let refreshed = store
        .api_mut()
        .get_task(task.id)
        .await
        .expect("fetch failed");
    assert!(refreshed.completed);
}

#[tokio::test]
async fn test_optimistic_toggle_rolls_back_on_failure() {
    let base_url = spawn_server().await;
    let (api, email, password) = registered_client(&base_url).await;
    let mut store = TaskStore::new(api);

    let input = CreateTask {
        title: "Doomed".to_string(),
        ..Default::default()
    };
    let task = store.create_task(&input).await.expect("create failed");

    // Delete the task behind the store's back so the toggle request fails.
    let mut saboteur = ApiClient::new(base_url.clone());
    saboteur
        .login(&email, &password)
        .await
        .expect("Failed to log in");
    saboteur.delete_task(task.id).await.expect("delete failed");

    let result = store.toggle_completion(task.id).await;

    assert!(result.is_none());
    assert!(store.error.is_some());
    // The optimistic flip was undone.
    let local = store.tasks.iter().find(|t| t.id == task.id).unwrap();
    assert!(!local.completed);
}

#[tokio::test]
async fn test_store_delete_updates_totals() {
    let base_url = spawn_server().await;
    let (api, _, _) = registered_client(&base_url).await;
    let mut store = TaskStore::new(api);

    let input = CreateTask {
        title: "Short lived".to_string(),
        ..Default::default()
    };
    let task = store.create_task(&input).await.expect("create failed");
    assert_eq!(store.total, 1);

    assert!(store.delete_task(task.id).await);
    assert_eq!(store.total, 0);
    assert!(store.tasks.is_empty());
}

#[tokio::test]
async fn test_store_update_is_server_confirmed() {
    let base_url = spawn_server().await;
    let (api, _, _) = registered_client(&base_url).await;
    let mut store = TaskStore::new(api);

    let input = CreateTask {
        title: "Draft".to_string(),
        ..Default::default()
    };
    let task = store.create_task(&input).await.expect("create failed");

    let patch = UpdateTask {
        title: Some("Final".to_string()),
        ..Default::default()
    };
    let updated = store
        .update_task(task.id, &patch)
        .await
        .expect("update failed");

    assert_eq!(updated.title, "Final");
    assert_eq!(store.tasks[0].title, "Final");
    assert!(store.error.is_none());
}
