#[cfg(test)]
pub mod test_utils {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, Once};

    use chrono::{DateTime, Duration, Utc};
    use rocket::http::{ContentType, Header, Status};
    use rocket::local::asynchronous::{Client, LocalResponse};
    use serde_json::{Value, json};
    use sqlx::{Pool, Sqlite, sqlite::SqlitePoolOptions};
    use tracing_subscriber::EnvFilter;

    use crate::auth::{TokenService, signup_admin};
    use crate::db::{create_cohort, create_enrollment, create_track, create_user};
    use crate::error::AppError;
    use crate::init_rocket;
    use crate::mailer::{Mailer, Notifier, OutboundEmail};
    use crate::models::{NewCohort, NewTrack, NewUser};

    static INIT: Once = Once::new();
    pub static STANDARD_PASSWORD: &str = "password123";
    pub const TEST_SECRET: &str = "test-signing-secret";
    pub const TEST_FRONTEND_URL: &str = "http://frontend.test";
    pub const TEST_MAIL_FROM: &str = "admissions@test.local";

    pub fn init_test_logging() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("debug"))
                .with_test_writer()
                .try_init();
        });
    }

    /// Keeps every email handed to it so tests can inspect what was sent.
    #[derive(Clone, Default)]
    pub struct RecordingMailer {
        sent: Arc<Mutex<Vec<OutboundEmail>>>,
    }

    impl RecordingMailer {
        pub fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Mailer for RecordingMailer {
        fn dispatch(&self, email: OutboundEmail) {
            self.sent.lock().unwrap().push(email);
        }
    }

    pub fn test_notifier() -> (Notifier, RecordingMailer) {
        let recorder = RecordingMailer::default();
        let notifier = Notifier::new(
            Arc::new(recorder.clone()),
            TEST_MAIL_FROM,
            TEST_FRONTEND_URL,
        );
        (notifier, recorder)
    }

    pub async fn test_pool() -> Pool<Sqlite> {
        init_test_logging();

        // One connection: the in-memory database lives only as long as it does.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    pub async fn count_rows(pool: &Pool<Sqlite>, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .expect("Failed to count rows")
    }

    #[derive(Default)]
    pub struct TestDbBuilder {
        admins: Vec<TestAdmin>,
        tracks: Vec<TestTrack>,
        cohorts: Vec<TestCohort>,
        applicants: Vec<TestApplicant>,
        enrollments: Vec<TestEnrollment>,
    }

    pub struct TestAdmin {
        pub username: String,
        pub password: String,
    }

    pub struct TestTrack {
        pub title: String,
        pub description: String,
    }

    pub struct TestCohort {
        pub title: String,
        pub start_date: DateTime<Utc>,
        pub orientation_date: Option<DateTime<Utc>>,
        pub duration: Option<String>,
    }

    pub struct TestApplicant {
        pub name: String,
        pub email: String,
        pub phone_number: String,
        pub track_title: String,
    }

    pub struct TestEnrollment {
        pub email: String,
        pub cohort_title: String,
    }

    impl TestDbBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn admin(self, username: &str) -> Self {
            self.admin_with_password(username, STANDARD_PASSWORD)
        }

        pub fn admin_with_password(mut self, username: &str, password: &str) -> Self {
            self.admins.push(TestAdmin {
                username: username.to_string(),
                password: password.to_string(),
            });
            self
        }

        pub fn track(mut self, title: &str, description: &str) -> Self {
            self.tracks.push(TestTrack {
                title: title.to_string(),
                description: description.to_string(),
            });
            self
        }

        /// A cohort starting `starts_in_days` from now, with orientation two
        /// days earlier.
        pub fn cohort(mut self, title: &str, starts_in_days: i64) -> Self {
            let start_date = Utc::now() + Duration::days(starts_in_days);
            self.cohorts.push(TestCohort {
                title: title.to_string(),
                start_date,
                orientation_date: Some(start_date - Duration::days(2)),
                duration: Some("12 weeks".to_string()),
            });
            self
        }

        pub fn applicant(mut self, name: &str, email: &str, phone: &str, track_title: &str) -> Self {
            self.applicants.push(TestApplicant {
                name: name.to_string(),
                email: email.to_string(),
                phone_number: phone.to_string(),
                track_title: track_title.to_string(),
            });
            self
        }

        pub fn enrollment(mut self, email: &str, cohort_title: &str) -> Self {
            self.enrollments.push(TestEnrollment {
                email: email.to_string(),
                cohort_title: cohort_title.to_string(),
            });
            self
        }

        pub async fn build(self) -> Result<TestDb, AppError> {
            let pool = test_pool().await;

            let mut admin_id_map: HashMap<String, i64> = HashMap::new();
            let mut track_id_map: HashMap<String, i64> = HashMap::new();
            let mut cohort_id_map: HashMap<String, i64> = HashMap::new();
            let mut user_id_map: HashMap<String, i64> = HashMap::new();
            let mut enrollment_id_map: HashMap<(String, String), i64> = HashMap::new();

            for admin in &self.admins {
                let created = signup_admin(&pool, &admin.username, &admin.password).await?;
                admin_id_map.insert(admin.username.clone(), created.id);
            }

            for track in &self.tracks {
                let created = create_track(
                    &pool,
                    &NewTrack {
                        title: track.title.clone(),
                        description: track.description.clone(),
                    },
                )
                .await?;
                track_id_map.insert(track.title.clone(), created.id);
            }

            for cohort in &self.cohorts {
                let created = create_cohort(
                    &pool,
                    &NewCohort {
                        title: cohort.title.clone(),
                        start_date: cohort.start_date,
                        orientation_date: cohort.orientation_date,
                        duration: cohort.duration.clone(),
                    },
                )
                .await?;
                cohort_id_map.insert(cohort.title.clone(), created.id);
            }

            for applicant in &self.applicants {
                let track_id = track_id_map
                    .get(&applicant.track_title)
                    .copied()
                    .ok_or_else(|| AppError::NotFound(applicant.track_title.clone()))?;

                let created = create_user(
                    &pool,
                    &NewUser {
                        name: applicant.name.clone(),
                        location: "Lagos".to_string(),
                        email: applicant.email.clone(),
                        phone_number: applicant.phone_number.clone(),
                        track_id,
                    },
                )
                .await?;
                user_id_map.insert(applicant.email.clone(), created.id);
            }

            for enrollment in &self.enrollments {
                let user_id = user_id_map
                    .get(&enrollment.email)
                    .copied()
                    .ok_or_else(|| AppError::NotFound(enrollment.email.clone()))?;
                let cohort_id = cohort_id_map
                    .get(&enrollment.cohort_title)
                    .copied()
                    .ok_or_else(|| AppError::NotFound(enrollment.cohort_title.clone()))?;

                let created = create_enrollment(&pool, user_id, cohort_id).await?;
                enrollment_id_map.insert(
                    (enrollment.email.clone(), enrollment.cohort_title.clone()),
                    created.id,
                );
            }

            Ok(TestDb {
                pool,
                admin_id_map,
                track_id_map,
                cohort_id_map,
                user_id_map,
                enrollment_id_map,
            })
        }
    }

    pub struct TestDb {
        pub pool: Pool<Sqlite>,
        pub admin_id_map: HashMap<String, i64>,
        pub track_id_map: HashMap<String, i64>,
        pub cohort_id_map: HashMap<String, i64>,
        pub user_id_map: HashMap<String, i64>,
        pub enrollment_id_map: HashMap<(String, String), i64>,
    }

    impl TestDb {
        pub fn admin_id(&self, username: &str) -> Option<i64> {
            self.admin_id_map.get(username).copied()
        }

        pub fn track_id(&self, title: &str) -> Option<i64> {
            self.track_id_map.get(title).copied()
        }

        pub fn cohort_id(&self, title: &str) -> Option<i64> {
            self.cohort_id_map.get(title).copied()
        }

        pub fn user_id(&self, email: &str) -> Option<i64> {
            self.user_id_map.get(email).copied()
        }

        pub fn enrollment_id(&self, email: &str, cohort_title: &str) -> Option<i64> {
            self.enrollment_id_map
                .get(&(email.to_string(), cohort_title.to_string()))
                .copied()
        }
    }

    pub async fn create_standard_test_db() -> TestDb {
        TestDbBuilder::new()
            .admin("admin_user")
            .track("Backend Engineering", "APIs, databases and services")
            .track("Product Design", "Research, wireframes and prototypes")
            .cohort("Cohort One", 30)
            .cohort("Cohort Two", 120)
            .applicant(
                "Ada Lovelace",
                "ada@example.com",
                "+2348000000001",
                "Backend Engineering",
            )
            .applicant(
                "Grace Hopper",
                "grace@example.com",
                "+2348000000002",
                "Product Design",
            )
            .enrollment("ada@example.com", "Cohort One")
            .enrollment("grace@example.com", "Cohort One")
            .build()
            .await
            .expect("Failed to build standard test database")
    }

    pub async fn setup_test_client(test_db: &TestDb) -> (Client, RecordingMailer) {
        let (notifier, recorder) = test_notifier();
        let rocket = init_rocket(
            test_db.pool.clone(),
            TokenService::new(TEST_SECRET),
            notifier,
        );

        let client = Client::tracked(rocket)
            .await
            .expect("Valid rocket instance");

        (client, recorder)
    }

    pub fn bearer(token: &str) -> Header<'static> {
        Header::new("Authorization", format!("Bearer {}", token))
    }

    pub async fn json_body(response: LocalResponse<'_>) -> Value {
        response
            .into_json::<Value>()
            .await
            .expect("Response body was not JSON")
    }

    pub async fn login_test_admin(client: &Client, username: &str, password: &str) -> String {
        let response = client
            .post("/api/v1/auth/login")
            .header(ContentType::JSON)
            .body(json!({ "username": username, "password": password }).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);

        let body = json_body(response).await;
        body["data"]["token"]
            .as_str()
            .expect("Login response had no token")
            .to_string()
    }
}
