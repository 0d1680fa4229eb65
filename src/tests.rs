#[cfg(test)]
mod integration_tests {
    use crate::test_utils::test_utils::{bearer, login, setup_test_server};
    use axum::http::{
        header::{COOKIE, SET_COOKIE},
        HeaderValue, StatusCode,
    };
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn get(server: &TestServer, path: &str, token: &str) -> axum_test::TestResponse {
        let (name, value) = bearer(token);
        server.get(path).add_header(name, value).await
    }

    async fn post(server: &TestServer, path: &str, token: &str, body: Value) -> axum_test::TestResponse {
        let (name, value) = bearer(token);
        server.post(path).add_header(name, value).json(&body).await
    }

    async fn put(server: &TestServer, path: &str, token: &str, body: Value) -> axum_test::TestResponse {
        let (name, value) = bearer(token);
        server.put(path).add_header(name, value).json(&body).await
    }

    fn registration(username: &str) -> Value {
        json!({
            "username": username,
            "password": "secret1",
            "confirm_password": "secret1",
            "email": format!("{}@example.com", username),
            "first_name": "Thandi",
            "last_name": "Nkosi",
            "phone_number": "0821234567",
            "farm_name": "Sunrise Farm",
            "location": "Limpopo"
        })
    }

    fn assert_validation_error(response: axum_test::TestResponse) {
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["success"], false);
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    fn product(name: &str) -> Value {
        json!({
            "name": name,
            "category": "Fruits",
            "production_date": "2024-05-10",
            "description": "Sun-ripened"
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = setup_test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let server = setup_test_server().await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({ "username": "admin", "password": "password" }))
            .await;
        response.assert_status(StatusCode::OK);
        let cookie = response.header(SET_COOKIE);
        assert!(cookie.to_str().unwrap().starts_with("agri_session="));

        let body: Value = response.json();
        assert!(body["success"].as_bool().unwrap());
        assert_eq!(body["data"]["user"]["role"], "Employee");
        assert!(body["data"]["user"].get("password_hash").is_none());
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let me = get(&server, "/api/v1/auth/me", &token).await;
        me.assert_status(StatusCode::OK);
        let me_body: Value = me.json();
        assert_eq!(me_body["data"]["username"], "admin");
        assert_eq!(me_body["data"]["full_name"], "Emily Mathews");

        // the cookie authenticates as well
        let by_cookie = server
            .get("/api/v1/auth/me")
            .add_header(
                COOKIE,
                HeaderValue::from_str(&format!("agri_session={}", token)).unwrap(),
            )
            .await;
        by_cookie.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let server = setup_test_server().await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({ "username": "admin", "password": "wrong" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_requests_without_session_are_rejected() {
        let server = setup_test_server().await;

        let response = server.get("/api/v1/auth/me").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = get(&server, "/api/v1/farmers", "not-a-real-token").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let server = setup_test_server().await;
        let token = login(&server, "jsmith", "password").await;

        let response = post(&server, "/api/v1/auth/logout", &token, json!({})).await;
        response.assert_status(StatusCode::OK);

        get(&server, "/api/v1/auth/me", &token)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_role_guards() {
        let server = setup_test_server().await;
        let farmer = login(&server, "jsmith", "password").await;
        let admin = login(&server, "admin", "password").await;

        get(&server, "/api/v1/farmers", &farmer)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        get(&server, "/api/v1/dashboard/employee", &farmer)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        get(&server, "/api/v1/me/profile", &admin)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let send = post(
            &server,
            "/api/v1/messages",
            &farmer,
            json!({ "recipient_id": 1, "subject": "Hi", "content": "Hello" }),
        )
        .await;
        send.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_registration_request_approval_flow() {
        let server = setup_test_server().await;
        let admin = login(&server, "admin", "password").await;

        let response = server
            .post("/api/v1/auth/register")
            .json(&registration("thandi"))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert!(body["data"]["user"].is_null());
        assert_eq!(body["data"]["request"]["status"], "Pending");
        let request_id = body["data"]["request"]["id"].as_i64().unwrap();

        // a pending request blocks the same username
        let duplicate = server
            .post("/api/v1/auth/register")
            .json(&registration("thandi"))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);

        // not a user yet
        server
            .post("/api/v1/auth/login")
            .json(&json!({ "username": "thandi", "password": "secret1" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let pending = get(&server, "/api/v1/registration-requests", &admin).await;
        pending.assert_status(StatusCode::OK);
        let pending_body: Value = pending.json();
        assert_eq!(pending_body["data"].as_array().unwrap().len(), 1);

        let approve_path = format!("/api/v1/registration-requests/{}/approve", request_id);
        let approved = post(&server, &approve_path, &admin, json!({})).await;
        approved.assert_status(StatusCode::OK);
        let approved_body: Value = approved.json();
        assert_eq!(approved_body["data"]["username"], "thandi");
        assert_eq!(approved_body["data"]["role"], "Farmer");

        let again = post(&server, &approve_path, &admin, json!({})).await;
        again.assert_status(StatusCode::CONFLICT);
        let again_body: Value = again.json();
        assert_eq!(again_body["code"], "INVALID_STATE");

        // the new farmer logs in and has a welcome message
        let thandi = login(&server, "thandi", "secret1").await;
        let profile = get(&server, "/api/v1/me/profile", &thandi).await;
        profile.assert_status(StatusCode::OK);
        let profile_body: Value = profile.json();
        assert_eq!(profile_body["data"]["farm_name"], "Sunrise Farm");

        let inbox = get(&server, "/api/v1/messages/inbox", &thandi).await;
        let inbox_body: Value = inbox.json();
        assert_eq!(inbox_body["data"][0]["subject"], "Welcome to Agri-Energy Connect");

        let remaining = get(&server, "/api/v1/registration-requests", &admin).await;
        let remaining_body: Value = remaining.json();
        assert!(remaining_body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_registration_request_rejection() {
        let server = setup_test_server().await;
        let admin = login(&server, "admin", "password").await;

        let response = server
            .post("/api/v1/auth/register")
            .json(&registration("sipho"))
            .await;
        let body: Value = response.json();
        let request_id = body["data"]["request"]["id"].as_i64().unwrap();
        let reject_path = format!("/api/v1/registration-requests/{}/reject", request_id);

        let no_reason = post(&server, &reject_path, &admin, json!({ "reason": "" })).await;
        assert_validation_error(no_reason);

        let rejected = post(
            &server,
            &reject_path,
            &admin,
            json!({ "reason": "Farm could not be verified" }),
        )
        .await;
        rejected.assert_status(StatusCode::OK);
        let rejected_body: Value = rejected.json();
        assert_eq!(rejected_body["data"]["status"], "Rejected");
        assert_eq!(rejected_body["data"]["rejection_reason"], "Farm could not be verified");

        server
            .post("/api/v1/auth/login")
            .json(&json!({ "username": "sipho", "password": "secret1" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let all = get(
            &server,
            "/api/v1/registration-requests?include_processed=true",
            &admin,
        )
        .await;
        let all_body: Value = all.json();
        assert_eq!(all_body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_validation_and_roles() {
        let server = setup_test_server().await;

        let mut mismatched = registration("thandi");
        mismatched["confirm_password"] = json!("other1");
        assert_validation_error(
            server
                .post("/api/v1/auth/register")
                .json(&mismatched)
                .await,
        );

        let mut bad_email = registration("thandi");
        bad_email["email"] = json!("not-an-email");
        let response = server
            .post("/api/v1/auth/register")
            .json(&bad_email)
            .await;
        assert_validation_error(response);

        let malformed = server
            .post("/api/v1/auth/register")
            .text("{\"username\": ")
            .content_type("application/json")
            .await;
        assert_validation_error(malformed);

        // existing username
        server
            .post("/api/v1/auth/register")
            .json(&registration("jsmith"))
            .await
            .assert_status(StatusCode::CONFLICT);

        let mut employee = registration("newstaff");
        employee["role"] = json!("Employee");
        server
            .post("/api/v1/auth/register")
            .json(&employee)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let admin = login(&server, "admin", "password").await;
        let created = post(&server, "/api/v1/auth/register", &admin, employee).await;
        created.assert_status(StatusCode::CREATED);
        let body: Value = created.json();
        assert_eq!(body["data"]["user"]["role"], "Employee");

        login(&server, "newstaff", "secret1").await;
    }

    #[tokio::test]
    async fn test_farmer_management() {
        let server = setup_test_server().await;
        let admin = login(&server, "admin", "password").await;

        let created = post(
            &server,
            "/api/v1/farmers",
            &admin,
            json!({
                "username": "thandi",
                "password": "secret1",
                "email": "thandi@example.com",
                "first_name": "Thandi",
                "last_name": "Nkosi",
                "phone_number": "0821234567",
                "farm_name": "Sunrise Farm",
                "location": "Limpopo"
            }),
        )
        .await;
        created.assert_status(StatusCode::CREATED);
        let created_body: Value = created.json();
        let farmer_id = created_body["data"]["id"].as_i64().unwrap();
        assert_eq!(created_body["data"]["product_count"], 0);

        let listing = get(&server, "/api/v1/farmers?page=1&page_size=1", &admin).await;
        listing.assert_status(StatusCode::OK);
        let page: Value = listing.json();
        assert_eq!(page["data"]["total_farmers"], 2);
        assert_eq!(page["data"]["total_pages"], 2);
        assert_eq!(page["data"]["farmers"].as_array().unwrap().len(), 1);
        assert_eq!(
            page["data"]["unique_locations"],
            json!(["Limpopo", "Western Cape"])
        );

        let search = get(&server, "/api/v1/farmers?search=sunrise", &admin).await;
        let search_body: Value = search.json();
        assert_eq!(search_body["data"]["total_farmers"], 1);
        assert_eq!(search_body["data"]["farmers"][0]["owner_name"], "Thandi Nkosi");

        assert_validation_error(get(&server, "/api/v1/farmers?status=bogus", &admin).await);
        assert_validation_error(get(&server, "/api/v1/farmers?page=0", &admin).await);
        assert_validation_error(get(&server, "/api/v1/farmers?page=abc", &admin).await);

        let updated = put(
            &server,
            &format!("/api/v1/farmers/{}", farmer_id),
            &admin,
            json!({
                "username": "thandi",
                "email": "thandi@example.com",
                "first_name": "Thandi",
                "last_name": "Nkosi",
                "phone_number": "0821234567",
                "farm_name": "Sunrise Orchards",
                "location": "Limpopo"
            }),
        )
        .await;
        updated.assert_status(StatusCode::OK);
        let updated_body: Value = updated.json();
        assert_eq!(updated_body["data"]["farm_name"], "Sunrise Orchards");

        // password untouched
        login(&server, "thandi", "secret1").await;

        // a blank password from the edit form also keeps the old one
        let blank_password = put(
            &server,
            &format!("/api/v1/farmers/{}", farmer_id),
            &admin,
            json!({
                "username": "thandi",
                "password": "",
                "email": "thandi@example.com",
                "first_name": "Thandi",
                "last_name": "Nkosi",
                "phone_number": "0821234567",
                "farm_name": "Sunrise Orchards",
                "location": "Limpopo"
            }),
        )
        .await;
        blank_password.assert_status(StatusCode::OK);
        login(&server, "thandi", "secret1").await;

        let short_password = put(
            &server,
            &format!("/api/v1/farmers/{}", farmer_id),
            &admin,
            json!({
                "username": "thandi",
                "password": "abc",
                "email": "thandi@example.com",
                "first_name": "Thandi",
                "last_name": "Nkosi",
                "phone_number": "0821234567",
                "farm_name": "Sunrise Orchards",
                "location": "Limpopo"
            }),
        )
        .await;
        assert_validation_error(short_password);

        get(&server, "/api/v1/farmers/999", &admin)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deactivated_farmer_cannot_log_in() {
        let server = setup_test_server().await;
        let admin = login(&server, "admin", "password").await;
        let farmer = login(&server, "jsmith", "password").await;

        let response = post(&server, "/api/v1/farmers/1/deactivate", &admin, json!({})).await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["is_active"], false);

        // open sessions stop working too
        get(&server, "/api/v1/me/profile", &farmer)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .post("/api/v1/auth/login")
            .json(&json!({ "username": "jsmith", "password": "password" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let inactive = get(&server, "/api/v1/farmers?status=inactive", &admin).await;
        let inactive_body: Value = inactive.json();
        assert_eq!(inactive_body["data"]["total_farmers"], 1);

        post(&server, "/api/v1/farmers/1/reactivate", &admin, json!({}))
            .await
            .assert_status(StatusCode::OK);
        login(&server, "jsmith", "password").await;
    }

    #[tokio::test]
    async fn test_farmer_products() {
        let server = setup_test_server().await;
        let farmer = login(&server, "jsmith", "password").await;

        let mine = get(&server, "/api/v1/me/products", &farmer).await;
        mine.assert_status(StatusCode::OK);
        let mine_body: Value = mine.json();
        assert_eq!(mine_body["data"]["products"].as_array().unwrap().len(), 4);
        assert_eq!(mine_body["data"]["products"][0]["name"], "Organic Maize");
        assert_eq!(
            mine_body["data"]["categories"],
            json!(["Dairy", "Grains", "Vegetables"])
        );

        let dairy = get(&server, "/api/v1/me/products?category=dairy", &farmer).await;
        let dairy_body: Value = dairy.json();
        assert_eq!(dairy_body["data"]["products"].as_array().unwrap().len(), 2);

        let created = post(&server, "/api/v1/me/products", &farmer, product("Mangoes")).await;
        created.assert_status(StatusCode::CREATED);
        let created_body: Value = created.json();
        let product_id = created_body["data"]["id"].as_i64().unwrap();
        assert_eq!(created_body["data"]["farm_name"], "Green Acres Farm");
        assert_eq!(created_body["data"]["category_color"], "#FFFDE7");

        let edited = put(
            &server,
            &format!("/api/v1/me/products/{}", product_id),
            &farmer,
            product("Alphonso Mangoes"),
        )
        .await;
        edited.assert_status(StatusCode::OK);
        let edited_body: Value = edited.json();
        assert_eq!(edited_body["data"]["name"], "Alphonso Mangoes");

        let invalid = post(
            &server,
            "/api/v1/me/products",
            &farmer,
            json!({ "name": "", "category": "Fruits", "production_date": "2024-05-10" }),
        )
        .await;
        assert_validation_error(invalid);
    }

    #[tokio::test]
    async fn test_farmers_cannot_touch_other_farmers_products() {
        let server = setup_test_server().await;
        let admin = login(&server, "admin", "password").await;

        post(
            &server,
            "/api/v1/farmers",
            &admin,
            json!({
                "username": "thandi",
                "password": "secret1",
                "email": "thandi@example.com",
                "first_name": "Thandi",
                "last_name": "Nkosi",
                "phone_number": "0821234567",
                "farm_name": "Sunrise Farm",
                "location": "Limpopo"
            }),
        )
        .await
        .assert_status(StatusCode::CREATED);
        let other = login(&server, "thandi", "secret1").await;

        get(&server, "/api/v1/products/1", &other)
            .await
            .assert_status(StatusCode::NOT_FOUND);
        put(&server, "/api/v1/me/products/1", &other, product("Stolen"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        post(&server, "/api/v1/products/1/deactivate", &other, json!({}))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let owner = login(&server, "jsmith", "password").await;
        get(&server, "/api/v1/products/1", &owner)
            .await
            .assert_status(StatusCode::OK);
        get(&server, "/api/v1/products/1", &admin)
            .await
            .assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_product_listing() {
        let server = setup_test_server().await;
        let admin = login(&server, "admin", "password").await;

        let page = get(&server, "/api/v1/products?page=2&page_size=3", &admin).await;
        page.assert_status(StatusCode::OK);
        let body: Value = page.json();
        assert_eq!(body["data"]["total_products"], 4);
        assert_eq!(body["data"]["total_pages"], 2);
        assert_eq!(body["data"]["current_page"], 2);
        assert_eq!(body["data"]["products"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["products"][0]["name"], "Carrots");

        let deactivated = post(&server, "/api/v1/products/4/deactivate", &admin, json!({})).await;
        deactivated.assert_status(StatusCode::OK);

        let active = get(&server, "/api/v1/products?active=true", &admin).await;
        let active_body: Value = active.json();
        assert_eq!(active_body["data"]["total_products"], 3);

        let search = get(&server, "/api/v1/products?search=brown", &admin).await;
        let search_body: Value = search.json();
        assert_eq!(search_body["data"]["products"][0]["name"], "Free-range Eggs");

        let by_farmer = get(&server, "/api/v1/farmers/1/products?category=Grains", &admin).await;
        by_farmer.assert_status(StatusCode::OK);
        let by_farmer_body: Value = by_farmer.json();
        assert_eq!(by_farmer_body["data"]["products"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_messaging() {
        let server = setup_test_server().await;
        let admin = login(&server, "admin", "password").await;
        let farmer = login(&server, "jsmith", "password").await;

        let unread = get(&server, "/api/v1/messages/unread-count", &farmer).await;
        let unread_body: Value = unread.json();
        assert_eq!(unread_body["data"]["unread_count"], 1);

        let sent = post(
            &server,
            "/api/v1/messages",
            &admin,
            json!({ "recipient_id": 2, "subject": "Harvest day", "content": "See you on Friday." }),
        )
        .await;
        sent.assert_status(StatusCode::CREATED);
        let sent_body: Value = sent.json();
        let message_id = sent_body["data"]["id"].as_i64().unwrap();
        assert_eq!(sent_body["data"]["recipient_name"], "John Smith");
        assert_eq!(sent_body["data"]["is_read"], false);

        let missing = post(
            &server,
            "/api/v1/messages",
            &admin,
            json!({ "recipient_id": 999, "subject": "Hi", "content": "Hello" }),
        )
        .await;
        missing.assert_status(StatusCode::NOT_FOUND);

        let outbox = get(&server, "/api/v1/messages/sent", &admin).await;
        let outbox_body: Value = outbox.json();
        assert_eq!(outbox_body["data"].as_array().unwrap().len(), 3);

        // the sender viewing it does not mark it read
        let as_sender = get(&server, &format!("/api/v1/messages/{}", message_id), &admin).await;
        let as_sender_body: Value = as_sender.json();
        assert_eq!(as_sender_body["data"]["is_read"], false);

        let mark_path = format!("/api/v1/messages/{}/read", message_id);
        let by_sender = post(&server, &mark_path, &admin, json!({})).await;
        let by_sender_body: Value = by_sender.json();
        assert_eq!(by_sender_body["data"], false);

        let first = post(&server, &mark_path, &farmer, json!({})).await;
        let first_body: Value = first.json();
        assert_eq!(first_body["data"], true);

        let second = post(&server, &mark_path, &farmer, json!({})).await;
        let second_body: Value = second.json();
        assert_eq!(second_body["data"], false);

        let viewed = get(&server, &format!("/api/v1/messages/{}", message_id), &farmer).await;
        let viewed_body: Value = viewed.json();
        assert_eq!(viewed_body["data"]["is_read"], true);
        assert_eq!(viewed_body["data"]["sender_role"], "Employee");
    }

    #[tokio::test]
    async fn test_viewing_a_message_marks_it_read_for_the_recipient() {
        let server = setup_test_server().await;
        let farmer = login(&server, "jsmith", "password").await;

        let inbox = get(&server, "/api/v1/messages/inbox", &farmer).await;
        let inbox_body: Value = inbox.json();
        let unread_id = inbox_body["data"][0]["id"].as_i64().unwrap();
        assert_eq!(inbox_body["data"][0]["is_read"], false);

        let viewed = get(&server, &format!("/api/v1/messages/{}", unread_id), &farmer).await;
        viewed.assert_status(StatusCode::OK);

        let unread = get(&server, "/api/v1/messages/unread-count", &farmer).await;
        let unread_body: Value = unread.json();
        assert_eq!(unread_body["data"]["unread_count"], 0);
    }

    #[tokio::test]
    async fn test_dashboards() {
        let server = setup_test_server().await;
        let admin = login(&server, "admin", "password").await;
        let farmer = login(&server, "jsmith", "password").await;

        let employee = get(&server, "/api/v1/dashboard/employee", &admin).await;
        employee.assert_status(StatusCode::OK);
        let employee_body: Value = employee.json();
        assert_eq!(employee_body["data"]["total_farmers"], 1);
        assert_eq!(employee_body["data"]["total_products"], 4);
        assert_eq!(employee_body["data"]["total_users"], 2);
        assert_eq!(employee_body["data"]["active_percentage"], 100.0);

        let mine = get(&server, "/api/v1/me/dashboard", &farmer).await;
        mine.assert_status(StatusCode::OK);
        let mine_body: Value = mine.json();
        assert_eq!(mine_body["data"]["total_products"], 4);
        assert_eq!(mine_body["data"]["category_count"], 3);
        assert_eq!(mine_body["data"]["farmer"]["farm_name"], "Green Acres Farm");
        assert_eq!(
            mine_body["data"]["recent_activities"].as_array().unwrap().len(),
            4
        );
    }

    #[tokio::test]
    async fn test_categories() {
        let server = setup_test_server().await;
        let farmer = login(&server, "jsmith", "password").await;

        let response = get(&server, "/api/v1/categories", &farmer).await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        let categories = body["data"].as_array().unwrap();
        assert!(categories.iter().any(|c| c["name"] == "Grains"));
        assert!(categories.iter().all(|c| c["color"].as_str().unwrap().starts_with('#')));
    }
}
