use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use skinlab_api::{
    classifier::{
        Classifier, ClassifyError, Engine, UNKNOWN_SKIN_TYPE,
        heuristic::{condition_scores, normalize, skin_type_scores},
        pixels::{FRAME_SIZE, PixelStats, is_skin_tone, prepare_frame},
        training::{dataset_stats, is_image, labels},
    },
    skin::ConditionScores,
};

const SKIN: [u8; 3] = [200, 140, 110];
const SKY: [u8; 3] = [40, 90, 200];

fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(rgb))
}

fn png_bytes(image: RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut out, ImageFormat::Png)
        .expect("png encoding");
    out.into_inner()
}

fn scores_total(scores: &ConditionScores) -> f64 {
    scores.iter().map(|(_, v)| v).sum()
}

#[tokio::test]
async fn skin_rule_matches_typical_tones() {
    assert!(is_skin_tone(SKIN[0], SKIN[1], SKIN[2]));
    assert!(!is_skin_tone(SKY[0], SKY[1], SKY[2]));
    assert!(!is_skin_tone(128, 128, 128));
}

#[tokio::test]
async fn prepare_frame_is_square() {
    let wide = DynamicImage::ImageRgb8(solid(640, 360, SKIN));
    let frame = prepare_frame(&wide);
    assert_eq!(frame.dimensions(), (FRAME_SIZE, FRAME_SIZE));

    let tall = DynamicImage::ImageRgb8(solid(90, 400, SKIN));
    assert_eq!(prepare_frame(&tall).dimensions(), (FRAME_SIZE, FRAME_SIZE));
}

#[tokio::test]
async fn uniform_frame_has_no_texture() {
    let stats = PixelStats::from_frame(&solid(FRAME_SIZE, FRAME_SIZE, SKIN));

    assert!(stats.samples > 0);
    assert!((stats.brightness - 200.0 / 255.0).abs() < 1e-9);
    assert!((stats.saturation - 90.0 / 200.0).abs() < 1e-9);
    assert!((stats.redness - 200.0 / 251.0).abs() < 1e-9);
    assert!(stats.texture.abs() < 1e-6);
    assert_eq!(stats.skin_coverage, 1.0);
}

#[tokio::test]
async fn samples_only_the_center() {
    // Skin in the middle, sky around the edges.
    let mut frame = solid(100, 100, SKY);
    for y in 15..85 {
        for x in 15..85 {
            frame.put_pixel(x, y, Rgb(SKIN));
        }
    }
    let stats = PixelStats::from_frame(&frame);
    assert_eq!(stats.skin_coverage, 1.0);
}

#[tokio::test]
async fn empty_sample_set_is_zeroed() {
    let stats = PixelStats::from_pixels(Vec::<[u8; 3]>::new());
    assert_eq!(stats, PixelStats::default());
}

#[tokio::test]
async fn skin_type_scores_are_clamped_percentages() {
    let bright = PixelStats {
        brightness: 1.0,
        saturation: 0.0,
        redness: 3.0,
        ..Default::default()
    };
    let scores = skin_type_scores(&bright);
    assert_eq!(scores.oily, 100.0);
    assert_eq!(scores.dry, 100.0);
    assert_eq!(scores.normal, 0.0);
    assert_eq!(scores.acne, 100.0);

    let balanced = PixelStats {
        brightness: 0.5,
        saturation: 0.5,
        redness: 0.5,
        ..Default::default()
    };
    let scores = skin_type_scores(&balanced);
    assert_eq!(scores.oily, 60.0);
    assert_eq!(scores.dry, 65.0);
    assert_eq!(scores.normal, 100.0);
    assert_eq!(scores.acne, 40.0);
    assert_eq!(scores.dominant(), "normal");
}

#[tokio::test]
async fn normalize_sums_to_one_hundred() {
    let scores = normalize(ConditionScores {
        acne: 0.3,
        blackheads: 0.1,
        clear_skin: 0.4,
        dark_spots: 0.1,
        puffy_eyes: 0.05,
        wrinkles: 0.05,
    });
    assert!((scores_total(&scores) - 100.0).abs() < 0.5);
    assert_eq!(scores.clear_skin, 40.0);
}

#[tokio::test]
async fn normalize_treats_nothing_as_clear_skin() {
    let scores = normalize(ConditionScores {
        acne: f64::NAN,
        blackheads: -2.0,
        ..Default::default()
    });
    assert_eq!(scores.clear_skin, 100.0);
    assert_eq!(scores_total(&scores), 100.0);
}

#[tokio::test]
async fn condition_scores_stay_in_range() {
    let stats = PixelStats::from_frame(&solid(FRAME_SIZE, FRAME_SIZE, SKIN));
    let scores = condition_scores(&stats);
    assert!(scores.iter().all(|(_, v)| (0.0..=100.0).contains(&v)));
    assert!((scores_total(&scores) - 100.0).abs() < 0.5);
}

#[tokio::test]
async fn frame_without_skin_is_unknown() {
    let classifier = Classifier::new(None);
    let result = classifier.classify_frame(&solid(FRAME_SIZE, FRAME_SIZE, SKY));

    assert!(!result.face_detected);
    assert_eq!(result.skin_type, UNKNOWN_SKIN_TYPE);
    assert_eq!(result.base_skin_type, None);
    assert_eq!(result.confidence, 0);
}

#[tokio::test]
async fn skin_frame_is_classified_by_heuristic() {
    let classifier = Classifier::new(None);
    let result = classifier
        .classify_bytes(&png_bytes(solid(300, 400, SKIN)))
        .expect("decodes");

    assert!(result.face_detected);
    assert_eq!(result.engine, Engine::Heuristic);
    assert_ne!(result.skin_type, UNKNOWN_SKIN_TYPE);
    assert_eq!(
        result.base_skin_type.as_deref(),
        Some(result.skin_type_scores.dominant())
    );
    assert!(result.confidence <= 100);
}

#[tokio::test]
async fn undecodable_bytes_are_rejected() {
    let classifier = Classifier::new(None);
    assert!(matches!(classifier.classify_bytes(&[]), Err(ClassifyError::Empty)));
    assert!(matches!(
        classifier.classify_bytes(b"not an image"),
        Err(ClassifyError::Decode(_))
    ));
}

#[tokio::test]
async fn missing_model_is_not_available() {
    let classifier = Classifier::new(Some("does/not/exist.onnx".into()));
    assert!(!classifier.model_available());
}

#[tokio::test]
async fn dataset_stats_count_images_per_label() {
    let root = std::env::temp_dir().join(format!("skinlab-dataset-{}", std::process::id()));
    let acne = root.join("acne");
    let wrinkles = root.join("wrinkles");
    tokio::fs::create_dir_all(&acne).await.expect("mkdir");
    tokio::fs::create_dir_all(&wrinkles).await.expect("mkdir");
    for name in ["a.jpg", "b.PNG", "notes.txt"] {
        tokio::fs::write(acne.join(name), b"x").await.expect("write");
    }
    tokio::fs::write(wrinkles.join("c.jpeg"), b"x").await.expect("write");

    let stats = dataset_stats(&root).await;
    assert_eq!(stats.categories.get("acne"), Some(&2));
    assert_eq!(stats.categories.get("wrinkles"), Some(&1));
    assert_eq!(stats.total_images, 3);

    tokio::fs::remove_dir_all(&root).await.ok();

    let missing = dataset_stats(&root).await;
    assert_eq!(missing.total_images, 0);
    assert!(missing.categories.is_empty());
}

#[tokio::test]
async fn image_extensions_and_labels() {
    assert!(is_image(std::path::Path::new("x/face.JPG")));
    assert!(!is_image(std::path::Path::new("x/face.gif")));
    assert_eq!(
        labels(),
        vec!["acne", "blackheads", "clear_skin", "dark_spots", "puffy_eyes", "wrinkles"]
    );
}
