use order_links::*;

fn confirmation(alternative_children: Vec<MimePart>) -> MimePart {
    MimePart::multipart(
        "multipart/mixed",
        vec![MimePart::multipart("multipart/alternative", alternative_children)],
    )
}

#[test]
fn test_locate_expected_shape() {
    let root = confirmation(vec![MimePart::leaf("text/html", "PGI-aGk8L2I-")]);

    let html = locate_html_body(&root).unwrap();

    assert_eq!(html.content_type, "text/html");
    assert_eq!(html.body.as_deref(), Some("PGI-aGk8L2I-"));
}

#[test]
fn test_locate_rejects_other_root_types() {
    for root_type in ["multipart/alternative", "text/html", "multipart/related"] {
        let root = MimePart::multipart(
            root_type,
            vec![MimePart::leaf("text/html", "aGk")],
        );

        let err = locate_html_body(&root).unwrap_err();
        assert_eq!(err.shape_step(), Some(ShapeStep::MixedRoot));
        assert!(err.to_string().contains("expected multipart/mixed at root"));
        assert!(err.to_string().contains(root_type));
    }
}

#[test]
fn test_first_html_child_wins() {
    let root = confirmation(vec![
        MimePart::leaf("text/plain", "cGxhaW4"),
        MimePart::leaf("text/html", "Zmlyc3Q"),
        MimePart::leaf("text/html", "c2Vjb25k"),
    ]);

    let html = locate_html_body(&root).unwrap();

    assert_eq!(html.body.as_deref(), Some("Zmlyc3Q"));
}

#[test]
fn test_first_alternative_child_wins() {
    let root = MimePart::multipart(
        "multipart/mixed",
        vec![
            MimePart::leaf("application/pdf", "JVBERg"),
            MimePart::multipart(
                "multipart/alternative",
                vec![MimePart::leaf("text/html", "Zmlyc3Q")],
            ),
            MimePart::multipart(
                "multipart/alternative",
                vec![MimePart::leaf("text/html", "c2Vjb25k")],
            ),
        ],
    );

    assert_eq!(
        locate_html_body(&root).unwrap().body.as_deref(),
        Some("Zmlyc3Q")
    );
}

#[test]
fn test_missing_alternative() {
    let root = MimePart::multipart(
        "multipart/mixed",
        vec![
            MimePart::leaf("text/html", "aGk"),
            MimePart::leaf("image/png", "iVBO"),
        ],
    );

    let err = locate_html_body(&root).unwrap_err();

    assert_eq!(err.shape_step(), Some(ShapeStep::Alternative));
    assert!(err.to_string().contains("no multipart/alternative child"));
    assert!(err.to_string().contains("text/html, image/png"));
}

#[test]
fn test_no_plain_text_fallback() {
    let root = confirmation(vec![MimePart::leaf("text/plain", "cGxhaW4")]);

    let err = locate_html_body(&root).unwrap_err();

    assert_eq!(err.shape_step(), Some(ShapeStep::Html));
    assert!(
        err.to_string()
            .contains("no text/html child in alternative part")
    );
}

#[test]
fn test_descent_is_not_recursive() {
    // html nested one level deeper than expected
    let root = confirmation(vec![MimePart::multipart(
        "multipart/related",
        vec![MimePart::leaf("text/html", "aGk")],
    )]);

    assert_eq!(
        locate_html_body(&root).unwrap_err().shape_step(),
        Some(ShapeStep::Html)
    );
}

#[test]
fn test_steps_individually() {
    let alt = MimePart::multipart("multipart/alternative", vec![MimePart::leaf("text/html", "aGk")]);
    let root = MimePart::multipart("multipart/mixed", vec![alt.clone()]);

    assert_eq!(expect_mixed_root(&root).unwrap(), &root);
    assert_eq!(find_alternative(&root).unwrap(), &alt);
    assert_eq!(find_html(&alt).unwrap().content_type, TEXT_HTML);

    assert!(expect_mixed_root(&alt).is_err());
    assert!(find_html(&root).is_err());
}
