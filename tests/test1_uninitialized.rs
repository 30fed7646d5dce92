use corral_db::prelude::*;
use tokio::runtime::Runtime;

// Runs in its own process with no pool ever installed, so every operation
// must hit the initialization guard rather than a panic or a hang.
#[test]
fn operations_before_initialize_fail_fast() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        assert!(active_pool().is_none());
        assert!(pool_status().is_none());

        let err = execute_query("SELECT 1", &[]).await.unwrap_err();
        assert!(matches!(err, DbError::NotInitialized));

        let batch = vec![QueryAndParams::new_without_params("SELECT 1")];
        let err = execute_transaction(&batch).await.unwrap_err();
        assert!(matches!(err, DbError::NotInitialized));

        let err = require_pool().unwrap_err();
        assert!(matches!(err, DbError::NotInitialized));

        // Liveness checks never raise; before initialization they are false.
        assert!(!test_connection().await);

        // Writes propagate the guard error; the graceful operations
        // degrade instead.
        let err = insert_record("animals", &[("name", DbValue::Text("Bessie".into()))])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotInitialized));

        assert!(!soft_delete("animals", 1).await);
        assert!(!table_exists("animals").await);

        let listing = select_paginated("animals", &QueryOptions::default()).await;
        assert!(!listing.success);
        assert_eq!(listing.count, 0);
        assert!(listing.data.is_empty());
        assert!(listing.message.is_some());

        // Teardown without a pool is a no-op, not an error.
        close();
        assert!(active_pool().is_none());
    });
    Ok(())
}
