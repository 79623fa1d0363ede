//! Demo content

use pagewright::{Page, PageId, Section};
use pagewright_repository::PageRepository;
use serde_json::json;
use tracing::info;

use crate::error::{ApiError, Result};

pub const DEMO_PAGE_ID: &str = "home";

/// Demo home page covering every built-in section type
pub fn demo_page() -> Result<Page> {
    let section = |key: &str, section_type: &str, props: serde_json::Value| {
        Section::from_value(key, section_type, props).map_err(|e| ApiError::Internal(e.to_string()))
    };

    Page::builder(DEMO_PAGE_ID)
        .title("Home")
        .section(section(
            "hero",
            "hero",
            json!({
                "title": "Welcome",
                "subtitle": "Learn, build and grow with us",
                "ctaLabel": "Apply now",
                "ctaHref": "/admissions"
            }),
        )?)
        .section(section(
            "programs",
            "courses",
            json!({
                "heading": "Featured programs",
                "courses": [
                    {"code": "CS101", "title": "Introduction to Computing", "credits": 3},
                    {"code": "BIO210", "title": "Cell Biology", "credits": 4}
                ]
            }),
        )?)
        .section(section(
            "people",
            "faculty",
            json!({
                "heading": "Meet the faculty",
                "members": [{"name": "Dr. Ada Park", "role": "Dean", "department": "Engineering"}]
            }),
        )?)
        .section(section(
            "voices",
            "testimonials",
            json!({
                "heading": "Student voices",
                "items": [{"quote": "The labs changed how I think.", "author": "Sam", "program": "BSc Physics"}]
            }),
        )?)
        .section(section(
            "history",
            "timeline",
            json!({
                "heading": "Our history",
                "events": [
                    {"date": "1890", "title": "Founded"},
                    {"date": "1962", "title": "Engineering school opens"}
                ]
            }),
        )?)
        .section(section(
            "about",
            "richText",
            json!({"heading": "About", "body": "A public university.\n\nOpen to everyone."}),
        )?)
        .build()
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Save the demo page unless one already exists
pub async fn seed_demo(repository: &PageRepository) -> Result<()> {
    if repository.exists(&PageId::from(DEMO_PAGE_ID)).await? {
        return Ok(());
    }
    let page = repository.save(&demo_page()?).await?;
    info!("Seeded demo page {} with {} sections", page.id, page.len());
    Ok(())
}
