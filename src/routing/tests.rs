#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use tempfile::TempDir;

    use crate::error::ContentError;
    use crate::node::handlers;
    use crate::node::service::StorageNode;
    use crate::routing::ring::{HashRing, hash_string_to_u64};
    use crate::routing::router::{NetworkContentService, placement_key};

    /// Starts a storage node on an ephemeral port; returns its address
    /// and the (kept-alive) directory backing it.
    async fn spawn_node() -> (String, TempDir) {
        let dir = TempDir::new().unwrap();
        let node = Arc::new(StorageNode::new(dir.path()).await.unwrap());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            axum::serve(listener, handlers::router(node)).await.unwrap();
        });

        (address, dir)
    }

    fn ring_of<S: AsRef<str>>(addresses: &[S]) -> HashRing {
        let mut ring = HashRing::new();
        for address in addresses {
            ring.insert(address.as_ref()).unwrap();
        }
        ring
    }

    // ============================================================
    // RING TESTS
    // ============================================================

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(
            hash_string_to_u64("localhost:8090"),
            hash_string_to_u64("localhost:8090"),
        );
        assert_ne!(
            hash_string_to_u64("localhost:8090"),
            hash_string_to_u64("localhost:8091"),
        );
    }

    #[test]
    fn test_ring_order_is_ascending() {
        let mut ring = HashRing::new();
        for port in 8090..8110 {
            ring.insert(&format!("localhost:{port}")).unwrap();
        }

        let hashes: Vec<u64> = ring
            .addresses()
            .iter()
            .map(|a| hash_string_to_u64(a))
            .collect();
        assert!(hashes.windows(2).all(|w| w[0] < w[1]));

        ring.remove("localhost:8100").unwrap();
        let hashes: Vec<u64> = ring
            .addresses()
            .iter()
            .map(|a| hash_string_to_u64(a))
            .collect();
        assert_eq!(hashes.len(), 19);
        assert!(hashes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ring_rejects_duplicate_address() {
        let mut ring = HashRing::new();
        ring.insert("localhost:8090").unwrap();

        let err = ring.insert("localhost:8090").unwrap_err();
        assert!(matches!(err, ContentError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_ring_remove_unknown_is_not_found() {
        let mut ring = HashRing::new();
        let err = ring.remove("localhost:9999").unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[test]
    fn test_empty_ring_has_no_owner() {
        let ring = HashRing::new();
        assert!(ring.lookup("vid1/manifest.mpd").is_none());
        assert!(ring.lookup_excluding("vid1/manifest.mpd", "x").is_none());
    }

    #[test]
    fn test_ownership_is_independent_of_insertion_order() {
        let ring_a = ring_of(&["localhost:8090", "localhost:8091", "localhost:8092"]);
        let ring_b = ring_of(&["localhost:8092", "localhost:8090", "localhost:8091"]);

        for i in 0..200 {
            let key = format!("vid{i}/seg{i}.m4s");
            assert_eq!(ring_a.lookup(&key), ring_b.lookup(&key));
        }
    }

    #[test]
    fn test_lookup_excluding_matches_ring_without_member() {
        let full = ring_of(&["localhost:8090", "localhost:8091", "localhost:8092"]);
        let without = ring_of(&["localhost:8090", "localhost:8092"]);

        for i in 0..200 {
            let key = format!("vid{i}/seg{i}.m4s");
            assert_eq!(
                full.lookup_excluding(&key, "localhost:8091"),
                without.lookup(&key),
            );
        }
    }

    #[test]
    fn test_single_member_owns_everything() {
        let ring = ring_of(&["localhost:8090"]);
        for i in 0..50 {
            assert_eq!(ring.lookup(&format!("vid{i}/f")), Some("localhost:8090"));
        }
    }

    // ============================================================
    // OPTIONS PARSING
    // ============================================================

    #[test]
    fn test_options_require_at_least_one_node() {
        let err = NetworkContentService::from_options("admin:1").unwrap_err();
        assert!(matches!(err, ContentError::Config(_)), "got {err:?}");

        let err = NetworkContentService::from_options("").unwrap_err();
        assert!(matches!(err, ContentError::Config(_)));
    }

    #[test]
    fn test_options_reject_duplicate_node() {
        let err =
            NetworkContentService::from_options("admin:1,localhost:8090,localhost:8090")
                .unwrap_err();
        assert!(matches!(err, ContentError::Config(_)));
    }

    #[tokio::test]
    async fn test_list_nodes_is_in_hash_order() {
        let service = NetworkContentService::from_options(
            "admin:1,localhost:8090,localhost:8091,localhost:8092",
        )
        .unwrap();

        let nodes = service.list_nodes().await;
        assert_eq!(nodes.len(), 3);
        let hashes: Vec<u64> = nodes.iter().map(|a| hash_string_to_u64(a)).collect();
        assert!(hashes.windows(2).all(|w| w[0] < w[1]));
    }

    // ============================================================
    // CLUSTER SCENARIOS (in-process storage nodes)
    // ============================================================

    #[tokio::test]
    async fn test_three_node_placement() {
        let (addr1, dir1) = spawn_node().await;
        let (addr2, dir2) = spawn_node().await;
        let (addr3, dir3) = spawn_node().await;

        let service = NetworkContentService::from_options(&format!(
            "admin:1,{addr1},{addr2},{addr3}"
        ))
        .unwrap();

        let payload = Bytes::from_static(&[0xCA, 0xFE, 0xBA, 0xBE]);
        service
            .write("vid1", "manifest.mpd", payload.clone())
            .await
            .unwrap();

        let ring = ring_of(&[&addr1, &addr2, &addr3]);
        let owner = ring.lookup(&placement_key("vid1", "manifest.mpd")).unwrap();

        let nodes = [(&addr1, &dir1), (&addr2, &dir2), (&addr3, &dir3)];
        for (address, dir) in nodes {
            let path = dir.path().join("vid1").join("manifest.mpd");
            if address == owner {
                assert_eq!(std::fs::read(&path).unwrap(), payload);
            } else {
                assert!(!path.exists(), "unexpected copy on {address}");
            }
        }

        let read_back = service.read("vid1", "manifest.mpd").await.unwrap();
        assert_eq!(read_back, payload);
    }

    #[tokio::test]
    async fn test_read_unknown_is_not_found() {
        let (addr1, _dir1) = spawn_node().await;
        let (addr2, _dir2) = spawn_node().await;
        let (addr3, _dir3) = spawn_node().await;

        let service = NetworkContentService::from_options(&format!(
            "admin:1,{addr1},{addr2},{addr3}"
        ))
        .unwrap();

        let err = service.read("vidX", "missing").await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_delete_is_final_through_router() {
        let (addr1, _dir1) = spawn_node().await;
        let (addr2, _dir2) = spawn_node().await;

        let service =
            NetworkContentService::from_options(&format!("admin:1,{addr1},{addr2}")).unwrap();

        service
            .write("vid1", "manifest.mpd", Bytes::from_static(b"data"))
            .await
            .unwrap();
        service.delete("vid1", "manifest.mpd").await.unwrap();

        let err = service.read("vid1", "manifest.mpd").await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_two_routers_agree_on_placement() {
        let (addr1, _dir1) = spawn_node().await;
        let (addr2, _dir2) = spawn_node().await;
        let (addr3, _dir3) = spawn_node().await;

        let options = format!("admin:1,{addr1},{addr2},{addr3}");
        let writer = NetworkContentService::from_options(&options).unwrap();
        let reader = NetworkContentService::from_options(&options).unwrap();

        for i in 0..20 {
            let payload = Bytes::from(format!("payload-{i}"));
            writer
                .write(&format!("vid{i}"), "manifest.mpd", payload.clone())
                .await
                .unwrap();
            let read_back = reader
                .read(&format!("vid{i}"), "manifest.mpd")
                .await
                .unwrap();
            assert_eq!(read_back, payload);
        }
    }

    #[tokio::test]
    async fn test_add_node_migrates_exactly_the_new_owners_keys() {
        let (addr1, dir1) = spawn_node().await;
        let (addr2, dir2) = spawn_node().await;

        let service =
            NetworkContentService::from_options(&format!("admin:1,{addr1},{addr2}")).unwrap();

        for i in 0..100 {
            service
                .write(
                    &format!("vid{i}"),
                    "manifest.mpd",
                    Bytes::from(format!("payload-{i}")),
                )
                .await
                .unwrap();
        }

        let (addr3, dir3) = spawn_node().await;
        let migrated = service.add_node(&addr3).await.unwrap();

        let old_ring = ring_of(&[&addr1, &addr2]);
        let new_ring = ring_of(&[&addr1, &addr2, &addr3]);

        let mut expected = 0u32;
        for i in 0..100 {
            let video_id = format!("vid{i}");
            let key = placement_key(&video_id, "manifest.mpd");
            let new_owner = new_ring.lookup(&key).unwrap();
            let old_owner = old_ring.lookup(&key).unwrap();

            let on_new = dir3.path().join(&video_id).join("manifest.mpd");
            let on_old = [(&addr1, &dir1), (&addr2, &dir2)]
                .into_iter()
                .find(|(a, _)| a.as_str() == old_owner)
                .map(|(_, d)| d.path().join(&video_id).join("manifest.mpd"))
                .unwrap();

            if new_owner == addr3 {
                expected += 1;
                assert!(on_new.exists(), "{key} missing from the added node");
                assert!(!on_old.exists(), "{key} still on its previous owner");
            } else {
                assert!(!on_new.exists(), "{key} wrongly moved to the added node");
            }

            // Every key stays readable through the router regardless.
            let read_back = service.read(&video_id, "manifest.mpd").await.unwrap();
            assert_eq!(read_back, Bytes::from(format!("payload-{i}")));
        }

        assert_eq!(migrated, expected);
        assert!(service.list_nodes().await.contains(&addr3));
    }

    #[tokio::test]
    async fn test_add_existing_node_is_rejected() {
        let (addr1, _dir1) = spawn_node().await;
        let (addr2, _dir2) = spawn_node().await;

        let service =
            NetworkContentService::from_options(&format!("admin:1,{addr1},{addr2}")).unwrap();

        let err = service.add_node(&addr1).await.unwrap_err();
        assert!(matches!(err, ContentError::Config(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_remove_node_drains_it_completely() {
        let (addr1, dir1) = spawn_node().await;
        let (addr2, dir2) = spawn_node().await;
        let (addr3, dir3) = spawn_node().await;

        let service = NetworkContentService::from_options(&format!(
            "admin:1,{addr1},{addr2},{addr3}"
        ))
        .unwrap();

        for i in 0..100 {
            service
                .write(
                    &format!("vid{i}"),
                    "manifest.mpd",
                    Bytes::from(format!("payload-{i}")),
                )
                .await
                .unwrap();
        }

        let full_ring = ring_of(&[&addr1, &addr2, &addr3]);
        let mut expected = 0u32;
        for i in 0..100 {
            let key = placement_key(&format!("vid{i}"), "manifest.mpd");
            if full_ring.lookup(&key) == Some(addr2.as_str()) {
                expected += 1;
            }
        }

        let migrated = service.remove_node(&addr2).await.unwrap();
        assert_eq!(migrated, expected);

        // The drained node's directory tree is empty.
        let leftovers: Vec<_> = std::fs::read_dir(dir2.path()).unwrap().collect();
        assert!(leftovers.is_empty(), "drained node still holds {leftovers:?}");

        let nodes = service.list_nodes().await;
        assert!(!nodes.contains(&addr2));
        assert_eq!(nodes.len(), 2);

        // Every key is still readable, now from one of the survivors.
        let survivor_ring = ring_of(&[&addr1, &addr3]);
        for i in 0..100 {
            let video_id = format!("vid{i}");
            let read_back = service.read(&video_id, "manifest.mpd").await.unwrap();
            assert_eq!(read_back, Bytes::from(format!("payload-{i}")));

            let owner = survivor_ring
                .lookup(&placement_key(&video_id, "manifest.mpd"))
                .unwrap();
            let dir = if owner == addr1 { &dir1 } else { &dir3 };
            assert!(dir.path().join(&video_id).join("manifest.mpd").exists());
        }
    }

    #[tokio::test]
    async fn test_remove_unknown_node_is_not_found() {
        let (addr1, _dir1) = spawn_node().await;

        let service =
            NetworkContentService::from_options(&format!("admin:1,{addr1}")).unwrap();

        let err = service.remove_node("localhost:1").await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reads_fail_once_the_last_node_is_removed() {
        let (addr1, _dir1) = spawn_node().await;

        let service =
            NetworkContentService::from_options(&format!("admin:1,{addr1}")).unwrap();

        // The node is empty, so draining it migrates nothing.
        let migrated = service.remove_node(&addr1).await.unwrap();
        assert_eq!(migrated, 0);
        assert!(service.list_nodes().await.is_empty());

        let err = service.read("vid1", "manifest.mpd").await.unwrap_err();
        assert!(matches!(err, ContentError::NoNodesAvailable), "got {err:?}");
    }
}
