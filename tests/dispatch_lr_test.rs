mod common;

use axum::http::{Method, StatusCode};
use sampletrack_api::auth::Role;
use serde_json::{json, Value};

use common::{employees, TestApp};

async fn create_root(app: &TestApp, item: &str, purpose: &str, recipient: &str) -> Value {
    let admin = app.token("A1", Role::Admin);
    let (status, record) = app
        .post(
            "/admin",
            &admin,
            json!({ "item": item, "purpose": purpose, "employees": employees(&[(recipient, 50)]) }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    record
}

async fn history(app: &TestApp) -> Vec<Value> {
    let admin = app.token("A1", Role::Admin);
    let (status, body) = app.get("/history/admin", &admin).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

#[tokio::test]
async fn dispatch_unknown_lineage_is_not_found() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);
    let (status, body) = app
        .request(Method::POST, "/dispatch/RT-missing", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn dispatch_requires_vendor_eligible_purpose() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);
    let root = create_root(&app, "Sample Board", "internal training", "RM1").await;
    let root_id = root["root_id"].as_str().unwrap();

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/dispatch/{}", root_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // the gate is all-or-nothing: nothing was flagged
    for record in history(&app).await {
        assert_eq!(record["to_vendor"], false);
    }
}

#[tokio::test]
async fn dispatch_flags_whole_lineage_and_feeds_vendor_list() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);
    let rm = app.token("RM1", Role::RegionalManager);
    let vendor = app.token("V1", Role::Vendor);

    let root = create_root(&app, "Sample Board", "marketing wave 1", "RM1").await;
    let root_id = root["root_id"].as_str().unwrap().to_string();

    let (status, regional) = app
        .post(
            "/allocate/rm",
            &rm,
            json!({
                "root_id": root_id,
                "item": "Sample Board",
                "region": "North",
                "employees": employees(&[("BM1", 20)]),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let rm_id = regional["rm_id"].as_str().unwrap().to_string();

    // dispatch addressed by the RM-level id still resolves the lineage
    let (status, body) = app
        .request(
            Method::POST,
            &format!("/dispatch/{}", rm_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 2);

    for record in history(&app).await {
        assert_eq!(record["to_vendor"], true);
        assert!(record["dispatched_at"].is_string());
    }

    // vendor list shows the dispatched, vendor-eligible records
    let (status, list) = app.get("/vendor/list", &vendor).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    // re-dispatch is idempotent on the flag
    let (status, body) = app
        .request(
            Method::POST,
            &format!("/dispatch/{}", root_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 2);
    for record in history(&app).await {
        assert_eq!(record["to_vendor"], true);
    }
}

#[tokio::test]
async fn vendor_list_is_role_gated_and_filtered() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);
    let employee = app.token("E1", Role::Employee);
    let vendor = app.token("V1", Role::Vendor);

    // one dispatched project lineage, one never-dispatched marketing record
    let dispatched = create_root(&app, "Board A", "Project Alpha", "RM1").await;
    create_root(&app, "Board B", "marketing later", "RM2").await;

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/dispatch/{}", dispatched["root_id"].as_str().unwrap()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/vendor/list", &employee).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, list) = app.get("/vendor/list", &vendor).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["item"], "Board A");

    // admins may read the vendor list too
    let (status, _) = app.get("/vendor/list", &admin).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn lr_annotation_targets_the_finest_lineage_level() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);
    let rm = app.token("RM1", Role::RegionalManager);
    let bm = app.token("BM1", Role::BranchManager);

    let root = create_root(&app, "Sample Board", "Project Beta", "RM1").await;
    let root_id = root["root_id"].as_str().unwrap().to_string();

    let (_, regional) = app
        .post(
            "/allocate/rm",
            &rm,
            json!({
                "root_id": root_id,
                "item": "Sample Board",
                "region": "North",
                "employees": employees(&[("BM1", 30)]),
            }),
        )
        .await;
    let rm_id = regional["rm_id"].as_str().unwrap().to_string();

    // two sibling branch sub-lineages under the same root
    let (_, first_branch) = app
        .post(
            "/allocate/bm",
            &bm,
            json!({
                "root_id": root_id,
                "rm_id": rm_id,
                "item": "Sample Board",
                "employees": employees(&[("E1", 10)]),
            }),
        )
        .await;
    let (_, second_branch) = app
        .post(
            "/allocate/bm",
            &bm,
            json!({
                "root_id": root_id,
                "rm_id": rm_id,
                "item": "Sample Board",
                "employees": employees(&[("E2", 5)]),
            }),
        )
        .await;
    let newest_bm_id = second_branch["bm_id"].as_str().unwrap().to_string();
    let older_bm_id = first_branch["bm_id"].as_str().unwrap().to_string();
    assert_ne!(newest_bm_id, older_bm_id);

    let (status, body) = app
        .put(
            &format!("/vendor/lr/{}", root_id),
            &admin,
            json!({ "lr_no": "LR-778899" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 1);

    // only the newest branch sub-lineage carries the LR number
    for record in history(&app).await {
        let has_lr = record["lr_no"].as_str() == Some("LR-778899");
        let is_newest_branch = record["bm_id"].as_str() == Some(newest_bm_id.as_str());
        assert_eq!(has_lr, is_newest_branch, "record: {}", record);
    }

    // running the same annotation again is idempotent
    let (status, body) = app
        .put(
            &format!("/vendor/lr/{}", root_id),
            &admin,
            json!({ "lr_no": "LR-778899" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 1);
}

#[tokio::test]
async fn lr_annotation_falls_back_to_root_key() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);

    let root = create_root(&app, "Sample Board", "", "RM1").await;
    let root_id = root["root_id"].as_str().unwrap();

    let (status, body) = app
        .put(
            &format!("/vendor/lr/{}", root_id),
            &admin,
            json!({ "lr_no": "LR-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 1);

    let records = history(&app).await;
    assert_eq!(records[0]["lr_no"], "LR-1");
    assert!(records[0]["lr_updated_at"].is_string());
}

#[tokio::test]
async fn lr_annotation_validates_input() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);

    let (status, _) = app
        .put("/vendor/lr/RT-missing", &admin, json!({ "lr_no": "LR-1" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let root = create_root(&app, "Sample Board", "", "RM1").await;
    let (status, _) = app
        .put(
            &format!("/vendor/lr/{}", root["root_id"].as_str().unwrap()),
            &admin,
            json!({ "lr_no": "  " }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
