#![cfg(all(feature = "postgres", feature = "test-utils"))]

use chrono::NaiveDateTime;
use corral_db::prelude::*;
use corral_db::test_utils::{setup_embedded_postgres, stop_embedded_postgres};
use tokio::runtime::Runtime;

#[test]
fn crud_against_embedded_postgres() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new().unwrap();
    let pg = rt.block_on(setup_embedded_postgres("cattle_tracking_test"))?;

    rt.block_on(async {
        let backend = initialize(&pg.config).await;
        assert_eq!(backend, BackendKind::Postgres);
        assert!(test_connection().await);

        execute_query(
            "CREATE TABLE animals (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                tag_number TEXT,
                weight_kg DOUBLE PRECISION,
                body_temp_c REAL,
                notes JSONB,
                born_on TIMESTAMP,
                checked_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                created_at TIMESTAMP NOT NULL DEFAULT now(),
                updated_at TIMESTAMP NOT NULL DEFAULT now(),
                deleted_at TIMESTAMP
            )",
            &[],
        )
        .await?;

        assert!(table_exists("animals").await);
        assert!(!table_exists("spaceships").await);

        // Inserts return the generated id, in insertion order.
        let bessie = insert_record("animals", &[
            ("name", DbValue::Text("Bessie".into())),
            ("tag_number", DbValue::Text("A-104".into())),
            ("weight_kg", DbValue::Float(412.5)),
            (
                "born_on",
                DbValue::Timestamp(NaiveDateTime::parse_from_str(
                    "2023-03-14 06:30:00",
                    "%Y-%m-%d %H:%M:%S",
                )?),
            ),
        ])
        .await?;
        assert_eq!(bessie, 1);

        let daisy = insert_record("animals", &[
            ("name", DbValue::Text("Daisy".into())),
            ("weight_kg", DbValue::Float(388.0)),
            ("notes", DbValue::Json(serde_json::json!({"temperament": "calm"}))),
        ])
        .await?;
        let clover = insert_record("animals", &[
            ("name", DbValue::Text("Clover".into())),
            ("weight_kg", DbValue::Float(455.25)),
        ])
        .await?;
        assert_eq!((daisy, clover), (2, 3));

        // Raw reads come back as typed values.
        let result = execute_query(
            "SELECT name, weight_kg, notes, born_on FROM animals WHERE id = $1",
            &[DbValue::Int(1)],
        )
        .await?;
        assert_eq!(result.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.get("name").and_then(DbValue::as_text), Some("Bessie"));
        assert_eq!(
            row.get("weight_kg").and_then(DbValue::as_float),
            Some(412.5)
        );
        assert!(row.get("born_on").and_then(DbValue::as_timestamp).is_some());
        assert!(row.get("notes").is_some_and(DbValue::is_null));

        // Column types the driver decodes through distinct Rust types:
        // TIMESTAMPTZ (what NOW() and the liveness probe return) and REAL.
        let now = execute_query("SELECT NOW() AS server_time", &[]).await?;
        assert!(now
            .first_value("server_time")
            .is_some_and(|v| v.as_timestamp().is_some()));

        execute_query(
            "UPDATE animals SET body_temp_c = 38.6 WHERE id = $1",
            &[DbValue::Int(1)],
        )
        .await?;
        let vitals = execute_query(
            "SELECT body_temp_c, checked_at FROM animals WHERE id = $1",
            &[DbValue::Int(1)],
        )
        .await?;
        let temp = vitals
            .first_value("body_temp_c")
            .and_then(DbValue::as_float)
            .unwrap();
        assert!((temp - 38.6).abs() < 0.001);
        assert!(vitals
            .first_value("checked_at")
            .is_some_and(|v| v.as_timestamp().is_some()));

        let notes = execute_query("SELECT notes FROM animals WHERE id = $1", &[DbValue::Int(2)])
            .await?;
        let temperament = notes
            .first_value("notes")
            .and_then(DbValue::as_json)
            .and_then(|v| v.get("temperament"))
            .and_then(|v| v.as_str());
        assert_eq!(temperament, Some("calm"));

        // Conditional update stamps updated_at and reports matches.
        let affected = update_records(
            "animals",
            &[("weight_kg", DbValue::Float(421.0))],
            &[("id", DbValue::Int(1))],
        )
        .await?;
        assert_eq!(affected, 1);

        let stamped = execute_query(
            "SELECT weight_kg, created_at, updated_at FROM animals WHERE id = $1",
            &[DbValue::Int(1)],
        )
        .await?;
        assert_eq!(
            stamped.first_value("weight_kg").and_then(DbValue::as_float),
            Some(421.0)
        );
        let created = stamped
            .first_value("created_at")
            .and_then(DbValue::as_timestamp)
            .unwrap();
        let updated = stamped
            .first_value("updated_at")
            .and_then(DbValue::as_timestamp)
            .unwrap();
        assert!(updated >= created);

        let no_match = update_records(
            "animals",
            &[("name", DbValue::Text("Ghost".into()))],
            &[("id", DbValue::Int(999))],
        )
        .await?;
        assert_eq!(no_match, 0);

        // Paginated listing: page sizes, total count, live-rows filter.
        let listing = select_paginated("animals", &QueryOptions::default()).await;
        assert!(listing.success);
        assert_eq!(listing.count, 3);
        assert_eq!(listing.data.len(), 3);

        let small_pages = QueryOptions {
            pagination: Pagination { page: 2, limit: 2 },
            order_by: Some("id ASC".into()),
            ..QueryOptions::default()
        };
        let page2 = select_paginated("animals", &small_pages).await;
        assert!(page2.success);
        assert_eq!(page2.count, 3);
        assert_eq!(page2.data.len(), 1);
        assert_eq!(
            page2.data[0].get("name").and_then(DbValue::as_text),
            Some("Clover")
        );

        // Soft delete marks once, then stops matching.
        assert!(soft_delete("animals", 2).await);
        assert!(!soft_delete("animals", 2).await);
        assert!(!soft_delete("animals", 999).await);

        let live_only = QueryOptions {
            filters: vec![("deleted_at".into(), DbValue::Null)],
            ..QueryOptions::default()
        };
        let live = select_paginated("animals", &live_only).await;
        assert!(live.success);
        assert_eq!(live.count, 2);
        assert!(live
            .data
            .iter()
            .all(|row| row.get("name").and_then(DbValue::as_text) != Some("Daisy")));

        // A bad statement propagates and the pool stays healthy after it.
        assert!(execute_query("SELECT nope FROM animals", &[]).await.is_err());
        let count = execute_query("SELECT COUNT(*) FROM animals", &[]).await?;
        assert_eq!(count.first_value("count").and_then(DbValue::as_int), Some(3));

        geo_search_checks().await?;

        close();
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    rt.block_on(stop_embedded_postgres(pg))?;
    Ok(())
}

// Exercised on the same server; skipped when the bundled binaries lack
// the earthdistance contrib extension.
async fn geo_search_checks() -> Result<(), Box<dyn std::error::Error>> {
    let cube = execute_query("CREATE EXTENSION IF NOT EXISTS cube", &[]).await;
    let earth = execute_query("CREATE EXTENSION IF NOT EXISTS earthdistance", &[]).await;
    if cube.is_err() || earth.is_err() {
        eprintln!("earthdistance extension unavailable; skipping geo assertions");
        return Ok(());
    }

    execute_query(
        "CREATE TABLE pastures (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            latitude DOUBLE PRECISION NOT NULL,
            longitude DOUBLE PRECISION NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT now(),
            updated_at TIMESTAMP NOT NULL DEFAULT now(),
            deleted_at TIMESTAMP
        )",
        &[],
    )
    .await?;

    let base = (46.5891, -112.0391);
    insert_record("pastures", &[
        ("name", DbValue::Text("home".into())),
        ("latitude", DbValue::Float(base.0)),
        ("longitude", DbValue::Float(base.1)),
    ])
    .await?;
    // ~5 km due north of home.
    insert_record("pastures", &[
        ("name", DbValue::Text("north_forty".into())),
        ("latitude", DbValue::Float(46.6341)),
        ("longitude", DbValue::Float(base.1)),
    ])
    .await?;
    // ~111 km away.
    insert_record("pastures", &[
        ("name", DbValue::Text("remote".into())),
        ("latitude", DbValue::Float(47.5891)),
        ("longitude", DbValue::Float(base.1)),
    ])
    .await?;
    // Same spot as home, but soft-deleted.
    let old_corral = insert_record("pastures", &[
        ("name", DbValue::Text("old_corral".into())),
        ("latitude", DbValue::Float(base.0)),
        ("longitude", DbValue::Float(base.1)),
    ])
    .await?;
    assert!(soft_delete("pastures", old_corral).await);

    // Ten kilometres: home and north_forty, closest first, deleted and
    // distant rows excluded.
    let nearby = search_within_radius("pastures", base.0, base.1, Some(10.0)).await?;
    assert_eq!(nearby.len(), 2);
    assert_eq!(
        nearby[0].get("name").and_then(DbValue::as_text),
        Some("home")
    );
    assert_eq!(
        nearby[1].get("name").and_then(DbValue::as_text),
        Some("north_forty")
    );
    let home_distance = nearby[0]
        .get("distance_km")
        .and_then(DbValue::as_float)
        .unwrap();
    assert!(home_distance < 0.1);
    let north_distance = nearby[1]
        .get("distance_km")
        .and_then(DbValue::as_float)
        .unwrap();
    assert!((4.0..6.0).contains(&north_distance));

    // Default radius is one kilometre.
    let close_by = search_within_radius("pastures", base.0, base.1, None).await?;
    assert_eq!(close_by.len(), 1);
    assert_eq!(
        close_by[0].get("name").and_then(DbValue::as_text),
        Some("home")
    );

    Ok(())
}
