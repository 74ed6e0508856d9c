#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Header, Status};
    use serde_json::json;

    use crate::test::test_utils::{
        STANDARD_PASSWORD, bearer, count_rows, create_standard_test_db, json_body,
        login_test_admin, setup_test_client,
    };

    #[rocket::async_test]
    async fn test_health() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;

        let response = client.get("/health").dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().await.unwrap(), "OK");
    }

    #[rocket::async_test]
    async fn test_signup_and_login_api() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;

        let response = client
            .post("/api/v1/auth/signup")
            .header(ContentType::JSON)
            .body(json!({ "username": "registrar", "password": "long-enough" }).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Created);
        let body = json_body(response).await;
        assert_eq!(body["status"], 201);
        assert_eq!(body["message"], "Admin created successfully");
        assert_eq!(body["data"]["admin"]["username"], "registrar");
        assert!(body["data"]["admin"].get("passwordHash").is_none());

        let response = client
            .post("/api/v1/auth/login")
            .header(ContentType::JSON)
            .body(json!({ "username": "registrar", "password": "long-enough" }).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        assert_eq!(body["data"]["admin"]["username"], "registrar");
        assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[rocket::async_test]
    async fn test_signup_validation_errors() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;

        let response = client
            .post("/api/v1/auth/signup")
            .header(ContentType::JSON)
            .body(json!({ "username": "ab", "password": "123" }).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Invalid data");
        assert_eq!(
            body["data"]["errors"],
            json!(["Please provide a valid password", "Please provide a username"])
        );
    }

    #[rocket::async_test]
    async fn test_login_with_bad_credentials() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;

        let response = client
            .post("/api/v1/auth/login")
            .header(ContentType::JSON)
            .body(json!({ "username": "admin_user", "password": "wrong_password" }).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Unauthorized);
        let body = json_body(response).await;
        assert_eq!(body["status"], 401);
        assert_eq!(body["message"], "Invalid Credentials");
    }

    #[rocket::async_test]
    async fn test_auth_required_apis() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;

        let endpoints = vec![
            "/api/v1/auth/me",
            "/api/v1/tracks/1",
            "/api/v1/cohorts",
            "/api/v1/users",
            "/api/v1/enrollments",
        ];

        for endpoint in endpoints {
            let response = client.get(endpoint).dispatch().await;
            assert_eq!(
                response.status(),
                Status::Unauthorized,
                "Endpoint {} did not require authentication",
                endpoint
            );

            let body = json_body(response).await;
            assert_eq!(body["message"], "Unauthenticated request!");
        }

        let response = client
            .put("/api/v1/enrollments/admit/1")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client
            .get("/api/v1/users")
            .header(bearer("not.a.valid.token"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client
            .get("/api/v1/users")
            .header(Header::new("Authorization", "Basic YWRtaW46cGFzcw=="))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn test_me_returns_current_admin() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;
        let token = login_test_admin(&client, "admin_user", STANDARD_PASSWORD).await;

        let response = client
            .get("/api/v1/auth/me")
            .header(bearer(&token))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        assert_eq!(body["data"]["admin"]["username"], "admin_user");
    }

    #[rocket::async_test]
    async fn test_track_listing_is_public() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;

        let response = client.get("/api/v1/tracks").dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        let tracks = body["data"]["tracks"].as_array().unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0]["title"], "Backend Engineering");
    }

    #[rocket::async_test]
    async fn test_track_crud_api() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;
        let token = login_test_admin(&client, "admin_user", STANDARD_PASSWORD).await;

        let response = client
            .post("/api/v1/tracks")
            .header(ContentType::JSON)
            .header(bearer(&token))
            .body(json!({ "title": "Cloud", "description": "Infrastructure" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Successfully created the track!");
        let id = body["data"]["track"]["id"].as_i64().unwrap();

        let response = client
            .put(format!("/api/v1/tracks/{}", id))
            .header(ContentType::JSON)
            .header(bearer(&token))
            .body(json!({ "title": "Cloud Engineering" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        assert_eq!(body["data"]["track"]["title"], "Cloud Engineering");
        assert_eq!(body["data"]["track"]["description"], "Infrastructure");

        let response = client
            .delete(format!("/api/v1/tracks/{}", id))
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client
            .get(format!("/api/v1/tracks/{}", id))
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
        let body = json_body(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "Track was not found!");
    }

    #[rocket::async_test]
    async fn test_update_missing_record_is_not_found() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;
        let token = login_test_admin(&client, "admin_user", STANDARD_PASSWORD).await;

        let response = client
            .put("/api/v1/cohorts/999")
            .header(ContentType::JSON)
            .header(bearer(&token))
            .body(json!({ "title": "Ghost cohort" }).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_cohort_create_and_list() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;
        let token = login_test_admin(&client, "admin_user", STANDARD_PASSWORD).await;

        let response = client
            .post("/api/v1/cohorts")
            .header(ContentType::JSON)
            .header(bearer(&token))
            .body(
                json!({
                    "title": "Cohort Three",
                    "startDate": "2030-01-06T09:00:00Z",
                    "orientationDate": "2030-01-04T09:00:00Z",
                    "duration": "16 weeks"
                })
                .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        let body = json_body(response).await;
        assert_eq!(body["data"]["cohort"]["title"], "Cohort Three");
        assert_eq!(body["data"]["cohort"]["duration"], "16 weeks");

        let response = client
            .get("/api/v1/cohorts")
            .header(bearer(&token))
            .dispatch()
            .await;
        let body = json_body(response).await;
        assert_eq!(body["data"]["cohorts"].as_array().unwrap().len(), 3);
    }

    #[rocket::async_test]
    async fn test_public_registration() {
        let test_db = create_standard_test_db().await;
        let (client, recorder) = setup_test_client(&test_db).await;
        let track_id = test_db.track_id("Product Design").unwrap();
        let cohort_id = test_db.cohort_id("Cohort Two").unwrap();

        let response = client
            .post("/api/v1/users")
            .header(ContentType::JSON)
            .body(
                json!({
                    "name": "Margaret Hamilton",
                    "location": "Abuja",
                    "email": "margaret@example.com",
                    "phoneNumber": "+2348000000010",
                    "trackId": track_id,
                    "cohortId": cohort_id
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Created);
        let body = json_body(response).await;
        assert_eq!(body["data"]["user"]["email"], "margaret@example.com");
        assert_eq!(body["data"]["user"]["track"], "Product Design");
        assert_eq!(body["data"]["enrollment"]["cohortId"], cohort_id);
        assert_eq!(count_rows(&test_db.pool, "enrollments").await, 3);
        assert_eq!(recorder.sent().len(), 1);
    }

    #[rocket::async_test]
    async fn test_registration_rejects_bad_input() {
        let test_db = create_standard_test_db().await;
        let (client, recorder) = setup_test_client(&test_db).await;
        let track_id = test_db.track_id("Product Design").unwrap();
        let cohort_id = test_db.cohort_id("Cohort Two").unwrap();

        let response = client
            .post("/api/v1/users")
            .header(ContentType::JSON)
            .body(
                json!({
                    "name": "Margaret Hamilton",
                    "location": "Abuja",
                    "email": "margaret-at-example",
                    "phoneNumber": "call me",
                    "trackId": track_id,
                    "cohortId": cohort_id
                })
                .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let body = json_body(response).await;
        let errors = body["data"]["errors"].as_array().unwrap();
        assert!(errors.contains(&json!("Please provide a valid email")));
        assert!(errors.contains(&json!("Please provide a valid phone number")));

        let response = client
            .post("/api/v1/users")
            .header(ContentType::JSON)
            .body(
                json!({
                    "name": "Ada Again",
                    "location": "Abuja",
                    "email": "ada@example.com",
                    "phoneNumber": "+2348000000011",
                    "trackId": track_id,
                    "cohortId": cohort_id
                })
                .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Conflict);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Record already exists");
        assert!(!body.to_string().contains("UNIQUE"));

        let response = client
            .post("/api/v1/users")
            .header(ContentType::JSON)
            .body(json!({ "name": "Incomplete" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Invalid data");

        assert!(recorder.sent().is_empty());
    }

    #[rocket::async_test]
    async fn test_admission_workflow_api() {
        let test_db = create_standard_test_db().await;
        let (client, recorder) = setup_test_client(&test_db).await;
        let token = login_test_admin(&client, "admin_user", STANDARD_PASSWORD).await;
        let ada = test_db
            .enrollment_id("ada@example.com", "Cohort One")
            .unwrap();
        let grace = test_db
            .enrollment_id("grace@example.com", "Cohort One")
            .unwrap();

        let response = client
            .put(format!("/api/v1/enrollments/admit/{}", ada))
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        assert_eq!(body["data"]["enrollment"]["status"], "admitted");
        assert_eq!(body["data"]["enrollment"]["admitted"], true);
        assert!(body["data"]["enrollment"]["deadline"].is_string());

        let response = client
            .put(format!("/api/v1/enrollments/admit/{}", ada))
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Conflict);

        let response = client
            .put(format!("/api/v1/enrollments/reject/{}", grace))
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        assert_eq!(body["data"]["enrollment"]["status"], "rejected");
        assert_eq!(body["data"]["enrollment"]["admitted"], false);

        // Confirmation comes from the applicant, not an admin.
        let response = client
            .put(format!("/api/v1/enrollments/confirm/{}", ada))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        assert_eq!(body["data"]["enrollment"]["status"], "confirmed");

        let response = client
            .put(format!("/api/v1/enrollments/confirm/{}", grace))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Conflict);

        let response = client
            .put("/api/v1/enrollments/admit/999")
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);

        assert_eq!(recorder.sent().len(), 2);
    }

    #[rocket::async_test]
    async fn test_enrollment_listing_and_delete() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;
        let token = login_test_admin(&client, "admin_user", STANDARD_PASSWORD).await;
        let id = test_db
            .enrollment_id("grace@example.com", "Cohort One")
            .unwrap();

        let response = client
            .get("/api/v1/enrollments")
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body = json_body(response).await;
        let enrollments = body["data"]["enrollments"].as_array().unwrap();
        assert_eq!(enrollments.len(), 2);
        assert_eq!(enrollments[0]["user"], "Ada Lovelace");
        assert_eq!(enrollments[0]["cohortTitle"], "Cohort One");
        assert_eq!(enrollments[0]["status"], "pending");

        let response = client
            .delete(format!("/api/v1/enrollments/{}", id))
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client
            .get(format!("/api/v1/enrollments/{}", id))
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_unknown_route_uses_envelope() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;

        let response = client.get("/api/v1/does-not-exist").dispatch().await;

        assert_eq!(response.status(), Status::NotFound);
        let body = json_body(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "Resource not found");
    }

    #[rocket::async_test]
    async fn test_openapi_document_lists_routes() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;

        let response = client.get("/api/v1/docs/openapi.json").dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        let doc = json_body(response).await;
        assert_eq!(doc["info"]["title"], "Enrollment API");
        assert!(doc["paths"]["/api/v1/enrollments/admit/{id}"]["put"].is_object());
        assert!(doc["paths"]["/api/v1/users"]["post"]["requestBody"].is_object());
        assert!(doc["paths"]["/api/v1/users"]["post"].get("security").is_none());
        assert_eq!(
            doc["components"]["securitySchemes"]["bearer_auth"]["scheme"],
            "bearer"
        );
    }

    #[rocket::async_test]
    async fn test_swagger_ui_is_public() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(&test_db).await;

        let response = client.get("/api/v1/docs").dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_type(), Some(ContentType::HTML));
        let page = response.into_string().await.unwrap();
        assert!(page.contains("/api/v1/docs/openapi.json"));
    }
}
