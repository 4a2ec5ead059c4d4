mod common;

use axum::http::{Method, StatusCode};
use sampletrack_api::auth::Role;
use serde_json::json;

use common::{employees, TestApp};

/// The full allocation chain: Admin → RM → BM → employee usage → dispatch.
#[tokio::test]
async fn allocation_chain_end_to_end() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);
    let rm = app.token("RM1", Role::RegionalManager);
    let bm = app.token("BM1", Role::BranchManager);
    let employee = app.token("E1", Role::Employee);

    // Admin allocates 100 units to RM1.
    let (status, root) = app
        .post(
            "/admin",
            &admin,
            json!({
                "item": "Sample Board",
                "purpose": "",
                "employees": employees(&[("RM1", 100)]),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let root_id = root["root_id"].as_str().unwrap().to_string();
    assert!(root["rm_id"].is_null());
    assert_eq!(root["purpose_tag"], "general");

    // RM1 re-allocates 40 to BM1.
    let (status, regional) = app
        .post(
            "/allocate/rm",
            &rm,
            json!({
                "root_id": root_id,
                "item": "Sample Board",
                "region": "North",
                "employees": employees(&[("BM1", 40)]),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(regional["root_id"], root_id.as_str());
    let rm_id = regional["rm_id"].as_str().unwrap().to_string();

    // BM1 re-allocates 15 to employee E1.
    let (status, branch) = app
        .post(
            "/allocate/bm",
            &bm,
            json!({
                "root_id": root_id,
                "rm_id": rm_id,
                "item": "Sample Board",
                "employees": employees(&[("E1", 15)]),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(branch["root_id"], root_id.as_str());
    assert_eq!(branch["rm_id"], rm_id.as_str());
    let branch_alloc_id = branch["id"].as_str().unwrap().to_string();
    assert!(branch["bm_id"].as_str().unwrap().starts_with("BM-"));

    // E1 uses 5 units against customer C100.
    let (status, updated) = app
        .post(
            "/assignments/used-sample",
            &employee,
            json!({
                "allocation_id": branch_alloc_id,
                "emp_code": "E1",
                "customer_id": "C100",
                "qty": 5,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["employees"][0]["used_qty"], 5);

    // E1's stock query folds the line into {total 15, used 5, stock 10}.
    let (status, overview) = app.get("/employee/E1", &employee).await;
    assert_eq!(status, StatusCode::OK);
    let stock = overview["stock"].as_array().unwrap();
    assert_eq!(stock.len(), 1);
    assert_eq!(stock[0]["name"], "Sample Board");
    assert_eq!(stock[0]["total"], 15);
    assert_eq!(stock[0]["used"], 5);
    assert_eq!(stock[0]["stock"], 10);

    // No project/marketing purpose anywhere in the lineage: dispatch refused.
    let (status, body) = app
        .request(
            Method::POST,
            &format!("/dispatch/{}", root_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // Amend the root record's purpose, then redispatch.
    let root_record_id = root["id"].as_str().unwrap();
    let (status, amended) = app
        .put(
            &format!("/allocations/{}/purpose", root_record_id),
            &admin,
            json!({ "purpose": "Project X" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amended["purpose_tag"], "project");

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/dispatch/{}", root_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 3);

    // Every record sharing the root id is now flagged.
    let (status, history) = app.get("/history/admin", &admin).await;
    assert_eq!(status, StatusCode::OK);
    let records = history.as_array().unwrap();
    assert_eq!(records.len(), 3);
    for record in records {
        assert_eq!(record["root_id"], root_id.as_str());
        assert_eq!(record["to_vendor"], true);
    }
}

#[tokio::test]
async fn history_is_newest_first() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);

    for item in ["First", "Second", "Third"] {
        let (status, _) = app
            .post(
                "/admin",
                &admin,
                json!({ "item": item, "employees": employees(&[("RM1", 10)]) }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, history) = app.get("/history/admin", &admin).await;
    assert_eq!(status, StatusCode::OK);
    let items: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["item"].as_str().unwrap())
        .collect();
    assert_eq!(items, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn creation_validates_required_fields() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);

    // missing item
    let (status, body) = app
        .post(
            "/admin",
            &admin,
            json!({ "item": "  ", "employees": employees(&[("RM1", 10)]) }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // no employee lines
    let (status, _) = app
        .post("/admin", &admin, json!({ "item": "Board", "employees": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // non-positive quantity
    let (status, body) = app
        .post(
            "/admin",
            &admin,
            json!({ "item": "Board", "employees": employees(&[("RM1", 0)]) }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("RM1"));

    // re-allocation without the parent chain id
    let rm = app.token("RM1", Role::RegionalManager);
    let (status, _) = app
        .post(
            "/allocate/rm",
            &rm,
            json!({ "root_id": "", "item": "Board", "employees": employees(&[("BM1", 5)]) }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_gates_protect_admin_routes() {
    let app = TestApp::new().await;
    let employee = app.token("E1", Role::Employee);

    let (status, _) = app
        .post(
            "/admin",
            &employee,
            json!({ "item": "Board", "employees": employees(&[("RM1", 5)]) }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // and no token at all is unauthorized
    let (status, _) = app
        .request(Method::GET, "/history/admin", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn branch_stock_includes_self_created_allocations() {
    let app = TestApp::new().await;
    let admin = app.token("A1", Role::Admin);
    let bm = app.token("BM1", Role::BranchManager);

    // BM1 receives 40 from the admin directly.
    let (status, root) = app
        .post(
            "/admin",
            &admin,
            json!({ "item": "Sample Board", "employees": employees(&[("BM1", 40)]) }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let root_id = root["root_id"].as_str().unwrap().to_string();

    // BM1 re-allocates 15 of it downstream.
    let (status, _) = app
        .post(
            "/allocate/bm",
            &bm,
            json!({
                "root_id": root_id,
                "rm_id": "RM-OUTSIDE",
                "item": "Sample Board",
                "employees": employees(&[("E1", 15)]),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // The branch view shows both the received record and the self-created one.
    let (status, overview) = app.get("/branch/stock", &bm).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["assignments"].as_array().unwrap().len(), 2);

    // BM1's own stock only counts the line addressed to them.
    let stock = overview["stock"].as_array().unwrap();
    assert_eq!(stock[0]["total"], 40);
}
