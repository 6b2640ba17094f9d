//! Full pipeline on a small in-memory dataset.

use corral::{export, pipeline, plot_table, Dataset, Dims, Kmeans, Pca, Record};

fn main() {
    // Three well-separated groups in 4D.
    let vectors: Vec<(String, Vec<f32>)> = vec![
        ("https://example.com/rust-borrowck".into(), vec![0.0, 0.1, 0.0, 0.2]),
        ("https://example.com/rust-lifetimes".into(), vec![0.2, 0.0, 0.1, 0.1]),
        ("https://example.com/sourdough".into(), vec![5.0, 5.1, 4.9, 5.0]),
        ("https://example.com/focaccia".into(), vec![5.1, 4.9, 5.0, 5.2]),
        ("https://example.com/k2-ascent".into(), vec![10.0, 0.1, 9.9, 0.0]),
        ("https://example.com/annapurna".into(), vec![10.1, 0.0, 10.0, 0.2]),
    ];

    let records = vectors
        .into_iter()
        .map(|(url, vector)| Record { url, vector })
        .collect();
    let data = Dataset::from_records(records).unwrap();

    let analysis = pipeline::run(&data, Dims::Two, &Kmeans::new(), &Pca::new()).unwrap();
    println!(
        "{} items, {} features -> k = {}",
        data.len(),
        data.n_features(),
        analysis.k
    );

    let rows = plot_table(&data, &analysis.labels, &analysis.coords);
    for row in &rows {
        println!(
            "  cluster {} ({:6.2}, {:6.2})  {}",
            row.cluster, row.coords[0], row.coords[1], row.url
        );
    }

    let groups = export::group_by_cluster(&data, &analysis.labels);
    println!("\nexport grouping:");
    for (id, urls) in &groups {
        println!("  {id}: {} urls", urls.len());
    }
}
