use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use study_materials::error::FetchError;
use study_materials::gateway::{
    Catalog, CatalogGateway, Credential, CredentialProvider, MemoryGateway, StaticCredentials,
};
use study_materials::models::{Course, CourseId, Material, Week, WeekId};
use study_materials::services::FetchDispatcher;
use study_materials::{Applied, Navigator};

fn catalog() -> Catalog {
    serde_json::from_str(include_str!("../fixtures/catalog.json")).expect("Failed to parse fixture")
}

/// Serves the fixture but holds back materials of one week.
struct SlowWeekGateway {
    inner: MemoryGateway,
    slow_week: WeekId,
    delay: Duration,
}

#[async_trait]
impl CatalogGateway for SlowWeekGateway {
    async fn fetch_courses(&self, credential: Option<&Credential>) -> Result<Vec<Course>, FetchError> {
        self.inner.fetch_courses(credential).await
    }

    async fn fetch_weeks(
        &self,
        course_id: CourseId,
        credential: Option<&Credential>,
    ) -> Result<Vec<Week>, FetchError> {
        self.inner.fetch_weeks(course_id, credential).await
    }

    async fn fetch_materials(
        &self,
        week_id: WeekId,
        credential: Option<&Credential>,
    ) -> Result<Vec<Material>, FetchError> {
        if week_id == self.slow_week {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.fetch_materials(week_id, credential).await
    }
}

/// Records which credential every call carried.
struct TokenCheckingGateway {
    expected: String,
}

#[async_trait]
impl CatalogGateway for TokenCheckingGateway {
    async fn fetch_courses(&self, credential: Option<&Credential>) -> Result<Vec<Course>, FetchError> {
        match credential {
            Some(c) if c.expose() == self.expected => Ok(catalog().courses),
            _ => Err(FetchError::Status {
                status: 401,
                body: "unauthorized".to_string(),
            }),
        }
    }

    async fn fetch_weeks(&self, _: CourseId, _: Option<&Credential>) -> Result<Vec<Week>, FetchError> {
        Ok(Vec::new())
    }

    async fn fetch_materials(&self, _: WeekId, _: Option<&Credential>) -> Result<Vec<Material>, FetchError> {
        Ok(Vec::new())
    }
}

struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn credential(&self) -> Option<Credential> {
        None
    }
}

#[tokio::test]
async fn slow_response_for_superseded_week_is_dropped() {
    let gateway = Arc::new(SlowWeekGateway {
        inner: MemoryGateway::new(catalog()),
        slow_week: 11,
        delay: Duration::from_millis(200),
    });
    let mut nav = Navigator::new(gateway, Arc::new(StaticCredentials::new(Some("t".to_string()))));
    let (dispatcher, mut outcomes) = FetchDispatcher::new(nav.fetch_service());

    dispatcher.dispatch(nav.start());
    let outcome = outcomes.recv().await.expect("courses outcome");
    assert_eq!(nav.apply(outcome), Applied::Applied);

    let course = nav.snapshot().store().courses().items()[0].clone();
    dispatcher.dispatch_opt(nav.select_course(course));
    let outcome = outcomes.recv().await.expect("weeks outcome");
    assert_eq!(nav.apply(outcome), Applied::Applied);

    // W1 (id 11) is slow; W2 (id 10) is selected before it answers.
    let weeks = nav.snapshot().store().weeks().items().to_vec();
    dispatcher.dispatch(nav.select_week(weeks[0].clone()).unwrap().expect("A"));
    dispatcher.dispatch(nav.select_week(weeks[1].clone()).unwrap().expect("B"));

    let first = outcomes.recv().await.expect("first outcome");
    assert_eq!(first.ticket.path.week, Some(10));
    assert_eq!(nav.apply(first), Applied::Applied);

    let second = outcomes.recv().await.expect("second outcome");
    assert_eq!(second.ticket.path.week, Some(11));
    assert_eq!(nav.apply(second), Applied::Stale);

    assert_eq!(nav.view().titles(), vec!["Coset notes"]);
}

#[tokio::test]
async fn credential_is_passed_through_to_gateway() {
    let gateway = Arc::new(TokenCheckingGateway {
        expected: "session-123".to_string(),
    });

    let mut nav = Navigator::new(
        gateway.clone(),
        Arc::new(StaticCredentials::new(Some("session-123".to_string()))),
    );
    let request = nav.start();
    nav.resolve(request).await;
    assert_eq!(nav.view().len(), 2);

    let mut anonymous = Navigator::new(gateway, Arc::new(NoCredentials));
    let request = anonymous.start();
    anonymous.resolve(request).await;
    assert!(anonymous.view().error().is_some());
}

#[tokio::test]
async fn outcome_is_dropped_quietly_when_loop_is_gone() {
    let gateway = Arc::new(MemoryGateway::new(catalog()));
    let mut nav = Navigator::new(gateway, Arc::new(StaticCredentials::default()));
    let (dispatcher, outcomes) = FetchDispatcher::new(nav.fetch_service());
    drop(outcomes);

    let handle = dispatcher.dispatch(nav.start());
    assert!(handle.await.is_ok());
}
