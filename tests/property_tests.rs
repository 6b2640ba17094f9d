use corral::{cluster_count, Dataset, Dims, Kmeans, Partition, Pca, Project, Record};
use proptest::prelude::*;

fn dataset(vectors: Vec<Vec<f32>>) -> Dataset {
    let records = vectors
        .into_iter()
        .enumerate()
        .map(|(i, vector)| Record {
            url: format!("https://example.com/{i}"),
            vector,
        })
        .collect();
    Dataset::from_records(records).unwrap()
}

proptest! {
    #[test]
    fn prop_cluster_count_law(n in 1usize..200) {
        let k = cluster_count(n);
        prop_assert_eq!(k, n.min(8));
        prop_assert!(k >= 1 && k <= 8 && k <= n);
    }

    #[test]
    fn prop_kmeans_all_assigned_in_bounds(
        vectors in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 1..20),
        k in 1usize..5
    ) {
        // Skip if k > n
        if k <= vectors.len() {
            let data = dataset(vectors);
            let labels = Kmeans::new().partition(&data, k).unwrap();

            prop_assert_eq!(labels.len(), data.len());
            for &l in &labels {
                prop_assert!(l < k);
            }
        }
    }

    #[test]
    fn prop_kmeans_deterministic(
        vectors in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 3), 2..15),
    ) {
        let k = cluster_count(vectors.len());
        let data = dataset(vectors);

        let a = Kmeans::new().partition(&data, k).unwrap();
        let b = Kmeans::new().partition(&data, k).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_projection_arity(
        vectors in prop::collection::vec(prop::collection::vec(-5.0f32..5.0, 1..8), 1..12),
        three_d in any::<bool>(),
    ) {
        // Rectangularize: truncate every vector to the shortest length.
        let width = vectors.iter().map(Vec::len).min().unwrap();
        let vectors: Vec<Vec<f32>> =
            vectors.into_iter().map(|mut v| { v.truncate(width); v }).collect();
        let dims = if three_d { Dims::Three } else { Dims::Two };

        let data = dataset(vectors);
        let coords = Pca::new().project(&data, dims).unwrap();

        prop_assert_eq!(coords.len(), data.len());
        for c in &coords {
            prop_assert_eq!(c.len(), dims.len());
        }
    }

    #[test]
    fn prop_zero_padding_law(
        values in prop::collection::vec(-100.0f32..100.0, 1..10),
    ) {
        // Width-1 vectors projected to 3D: first component passes through,
        // the padded components are exactly zero.
        let data = dataset(values.iter().map(|&v| vec![v]).collect());
        let coords = Pca::new().project(&data, Dims::Three).unwrap();

        for (c, &v) in coords.iter().zip(&values) {
            prop_assert_eq!(c.as_slice(), &[v, 0.0, 0.0]);
        }
    }

    #[test]
    fn prop_identity_law(
        vectors in prop::collection::vec(prop::collection::vec(-100.0f32..100.0, 2), 1..10),
    ) {
        let data = dataset(vectors.clone());
        let coords = Pca::new().project(&data, Dims::Two).unwrap();
        prop_assert_eq!(coords, vectors);
    }

    #[test]
    fn prop_export_complete(
        vectors in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 1..25),
    ) {
        let data = dataset(vectors);
        let k = cluster_count(data.len());
        let labels = if data.len() == 1 {
            vec![0]
        } else {
            Kmeans::new().partition(&data, k).unwrap()
        };

        let groups = corral::export::group_by_cluster(&data, &labels);

        // Every URL exactly once across all groups.
        let total: usize = groups.values().map(Vec::len).sum();
        prop_assert_eq!(total, data.len());

        let mut seen: Vec<&String> = groups.values().flatten().collect();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), data.len());

        // Keys are observed labels only, all within [0, k).
        for &id in groups.keys() {
            prop_assert!(id < k);
        }
    }
}
