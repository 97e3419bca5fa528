//! Artifact resolution over HTTP: unreachable or broken artifacts are skipped, the rest are kept in order.

mod common;

use image_generation_client::Artifact;

#[tokio::test]
async fn test_one_missing_url_out_of_three() {
    let mut server = mockito::Server::new_async().await;
    for path in ["/a.png", "/c.png"] {
        server
            .mock("GET", path)
            .with_status(200)
            .with_body(common::png_bytes())
            .create_async()
            .await;
    }
    server
        .mock("GET", "/b.png")
        .with_status(404)
        .create_async()
        .await;

    let artifacts: Vec<Artifact> = ["/a.png", "/b.png", "/c.png"]
        .iter()
        .map(|p| Artifact::Url(format!("{}{}", server.url(), p)))
        .collect();

    let images = common::resolver().resolve(&artifacts, "sunset").await;

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].prompt, "sunset");
}

#[tokio::test]
async fn test_non_image_body_is_skipped() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>not found</html>")
        .create_async()
        .await;

    let images = common::resolver()
        .resolve(&[Artifact::Url(format!("{}/page", server.url()))], "p")
        .await;

    assert!(images.is_empty());
}

#[tokio::test]
async fn test_mixed_url_and_inline() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/x.png")
        .with_status(200)
        .with_body(common::png_bytes())
        .create_async()
        .await;

    let artifacts = vec![
        Artifact::from_file_entry(format!("{}/x.png", server.url())),
        Artifact::from_file_entry(common::png_base64()),
    ];
    let images = common::resolver().resolve(&artifacts, "p").await;

    assert_eq!(images.len(), 2);
    assert_eq!(images[1].file_name(1), "image-2.png");
}
