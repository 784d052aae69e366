mod init;

#[cfg(test)]
mod tests {
    use super::init::init;
    use fluent_core::{Database, DatabaseContext, DatabaseError, DatabaseQuery, Driver, Error};
    use fluent_postgres::{PostgresConfiguration, PostgresError};
    use fluent_tests::{execute_tests, init_logs, silent_logs};
    use std::{sync::Mutex, time::Duration};

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn postgres() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let Some((url, _container)) = init().await else {
            return;
        };
        let driver = PostgresConfiguration::from_url(&url)
            .expect("Could not parse the url")
            .with_max_connections_per_event_loop(4)
            .with_event_loops(2)
            .make_driver()
            .expect("Could not create the driver");
        execute_tests(driver).await;
    }

    #[tokio::test]
    async fn pool_timeout() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let Some((url, _container)) = init().await else {
            return;
        };
        let driver = PostgresConfiguration::from_url(&url)
            .expect("Could not parse the url")
            .with_connection_pool_timeout(Duration::from_millis(200))
            .make_driver()
            .expect("Could not create the driver");
        let database = driver.make_database(DatabaseContext::new("fluent::pool"));
        let other = driver.make_database(DatabaseContext::new("fluent::pool"));
        let result = database
            .with_connection(|_| {
                Box::pin(async move {
                    // The only connection is taken
                    Ok(silent_logs! {
                        other.fetch_all(&DatabaseQuery::new("pg_type")).await
                    })
                })
            })
            .await
            .expect("Could not pin the connection");
        let error = result.expect_err("No connection should be available");
        assert!(matches!(
            error.database_error::<PostgresError>(),
            Some(e) if e.is_pool_timeout()
        ));
        assert!(!error.is_connection_closed());
        driver.shutdown();
    }

    #[tokio::test]
    async fn unreachable_server() {
        let driver = PostgresConfiguration::from_url("postgres://nobody@127.0.0.1:1/nothing")
            .expect("Could not parse the url")
            .make_driver()
            .expect("Could not create the driver");
        let database = driver.make_database(DatabaseContext::default());
        let result = silent_logs! { database.fetch_all(&DatabaseQuery::new("planets")).await };
        assert!(matches!(result, Err(Error::Database(..))));
    }

    #[tokio::test]
    async fn wrong_url() {
        assert!(PostgresConfiguration::from_url("mysql://some_url").is_err());
        assert!(PostgresConfiguration::from_url("postgres://").is_err());
    }
}
