//! Typed portfolio content model.
//!
//! Field names follow the camelCase keys used by both the CMS documents and
//! the static fallback document. Everything except the shape-checked fields
//! defaults when absent, so partially filled CMS documents still decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder image shown when an item has no image of its own.
pub const DEFAULT_FALLBACK_IMAGE: &str = "/images/placeholder.svg";

/// Alt text paired with [`DEFAULT_FALLBACK_IMAGE`].
pub const DEFAULT_IMAGE_ALT: &str = "Portfolio image";

/// Root content document for the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioConfig {
    pub personal: Personal,
    #[serde(default)]
    pub seo: SeoMeta,
    #[serde(default)]
    pub social: BTreeMap<String, String>,
    #[serde(default)]
    pub assets: Assets,
    #[serde(default)]
    pub navigation: Vec<NavigationItem>,
    #[serde(default)]
    pub skills: BTreeMap<String, Vec<String>>,
    pub case_studies: Vec<CaseStudy>,
    pub maker_projects: Vec<MakerProject>,
    pub writing: Vec<Article>,
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

impl PortfolioConfig {
    /// Find a case study by its routing id.
    pub fn case_study(&self, id: &str) -> Option<&CaseStudy> {
        self.case_studies.iter().find(|study| study.id == id)
    }

    /// Find a maker project by its routing id.
    pub fn maker_project(&self, id: &str) -> Option<&MakerProject> {
        self.maker_projects.iter().find(|project| project.id == id)
    }
}

// =============================================================================
// Personal / SEO / Assets
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Personal {
    pub name: String,
    pub title: String,
    pub tagline: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub resume_link: String,
    pub bio: String,
    pub years_experience: f64,
    pub current_role: String,
    pub domains: Vec<String>,
    pub metrics: Metrics,
    pub background: Background,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metrics {
    pub users_impacted: String,
    pub arpu_uplift: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Background {
    pub intro: String,
    pub philosophy: BTreeMap<String, Principle>,
    pub highlights: Highlights,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Principle {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Highlights {
    pub major_launches: String,
    pub side_projects: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub og_image: String,
    pub twitter_handle: String,
}

/// Asset defaults; not stored in the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Assets {
    pub fallback_image: String,
    pub default_image_alt: String,
    pub loading_states: LoadingStates,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            fallback_image: DEFAULT_FALLBACK_IMAGE.to_string(),
            default_image_alt: DEFAULT_IMAGE_ALT.to_string(),
            loading_states: LoadingStates::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingStates {
    pub enabled: bool,
    pub placeholder: String,
}

impl Default for LoadingStates {
    fn default() -> Self {
        Self {
            enabled: true,
            placeholder: "Loading...".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationItem {
    pub name: String,
    pub href: String,
}

// =============================================================================
// Coming-soon gating
// =============================================================================

/// Publication state of a gated content item.
///
/// Pending items only expose their title; the detail is dropped at decode
/// time so it cannot be rendered by accident.
#[derive(Debug, Clone, PartialEq)]
pub enum Release<T> {
    Complete(T),
    Pending(Placeholder),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholder {
    pub title: String,
}

/// Detail types that carry the title shown on placeholders.
pub trait Titled {
    fn title(&self) -> &str;
}

impl<T: Titled> Release<T> {
    pub fn title(&self) -> &str {
        match self {
            Release::Complete(detail) => detail.title(),
            Release::Pending(placeholder) => &placeholder.title,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Release::Pending(_))
    }

    /// The full detail, or `None` while the item is coming soon.
    pub fn detail(&self) -> Option<&T> {
        match self {
            Release::Complete(detail) => Some(detail),
            Release::Pending(_) => None,
        }
    }
}

impl<T: Serialize> Serialize for Release<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Gated<'a, D> {
            #[serde(flatten)]
            detail: &'a D,
            #[serde(rename = "comingSoon")]
            coming_soon: bool,
        }

        match self {
            Release::Complete(detail) => Gated {
                detail,
                coming_soon: false,
            }
            .serialize(serializer),
            Release::Pending(placeholder) => Gated {
                detail: placeholder,
                coming_soon: true,
            }
            .serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de> + Titled> Deserialize<'de> for Release<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Gated<D> {
            #[serde(default, rename = "comingSoon")]
            coming_soon: Option<bool>,
            #[serde(flatten)]
            detail: D,
        }

        let gated = Gated::<T>::deserialize(deserializer)?;
        if gated.coming_soon.unwrap_or(false) {
            Ok(Release::Pending(Placeholder {
                title: gated.detail.title().to_string(),
            }))
        } else {
            Ok(Release::Complete(gated.detail))
        }
    }
}

// =============================================================================
// Case studies
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudy {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub release: Release<CaseStudyDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaseStudyDetail {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    pub tags: Vec<String>,
    pub duration: String,
    pub team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub impact: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<CaseStudyContent>,
}

impl Titled for CaseStudyDetail {
    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaseStudyContent {
    pub context: Option<String>,
    pub problem: Option<String>,
    pub process: Vec<ProcessPhase>,
    pub artifacts: Vec<String>,
    pub impact_details: Option<String>,
    pub reflection: Option<Reflection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessPhase {
    pub title: String,
    pub description: String,
    pub weeks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reflection {
    pub what_went_well: Option<String>,
    pub what_id_do_differently: Option<String>,
    pub key_takeaway: Option<String>,
}

// =============================================================================
// Maker projects
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakerProject {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub release: Release<MakerProjectDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakerProjectDetail {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub stats: BTreeMap<String, String>,
}

impl Titled for MakerProjectDetail {
    fn title(&self) -> &str {
        &self.title
    }
}

// =============================================================================
// Writing
// =============================================================================

pub type Article = Release<ArticleDetail>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticleDetail {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub url: String,
    pub platform: Platform,
    pub publish_date: String,
    pub read_time: String,
    pub tags: Vec<String>,
}

impl Titled for ArticleDetail {
    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Medium,
    Linkedin,
    Blog,
    #[default]
    #[serde(other)]
    Other,
}

// =============================================================================
// Resources
// =============================================================================

pub type Resource = Release<ResourceDetail>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceDetail {
    pub title: String,
    pub description: String,
    pub download_url: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub size: String,
}

impl Titled for ResourceDetail {
    fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Template,
    Framework,
    Guide,
    Toolkit,
    #[default]
    #[serde(other)]
    Other,
}

// =============================================================================
// Testimonials
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub name: String,
    pub role: String,
    pub company: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    pub text: String,
    pub project: String,
}

/// Star rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "f64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Rating(Self::MIN);
        }
        Rating(value.round().clamp(Self::MIN as f64, Self::MAX as f64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<f64> for Rating {
    fn from(value: f64) -> Self {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rating_is_clamped() {
        assert_eq!(Rating::new(0.0).value(), 1);
        assert_eq!(Rating::new(-3.0).value(), 1);
        assert_eq!(Rating::new(4.4).value(), 4);
        assert_eq!(Rating::new(9.0).value(), 5);

        let testimonial: Testimonial =
            serde_json::from_value(json!({"name": "Priya", "rating": 7, "text": "Great"})).unwrap();
        assert_eq!(testimonial.rating, Some(Rating::new(5.0)));
    }

    #[test]
    fn test_pending_case_study_drops_detail() {
        let study: CaseStudy = serde_json::from_value(json!({
            "id": "coupons",
            "title": "Coupon Engine",
            "subtitle": "Flexible campaigns",
            "tags": ["payments"],
            "comingSoon": true
        }))
        .unwrap();

        assert_eq!(study.id, "coupons");
        assert!(study.release.is_pending());
        assert_eq!(study.release.title(), "Coupon Engine");
        assert!(study.release.detail().is_none());
    }

    #[test]
    fn test_complete_case_study_keeps_detail() {
        let study: CaseStudy = serde_json::from_value(json!({
            "id": "checkout",
            "title": "Checkout Redesign",
            "impact": {"conversionRate": "+45%"},
            "comingSoon": false,
            "content": {
                "context": "Legacy checkout",
                "process": [{"title": "Discovery", "description": "Interviews", "weeks": "1-2"}]
            }
        }))
        .unwrap();

        let detail = study.release.detail().expect("complete item");
        assert_eq!(detail.impact.get("conversionRate").map(String::as_str), Some("+45%"));
        let content = detail.content.as_ref().unwrap();
        assert_eq!(content.process[0].weeks, "1-2");
    }

    #[test]
    fn test_pending_item_serializes_as_placeholder() {
        let article: Article = Release::Pending(Placeholder {
            title: "Pricing Pages".to_string(),
        });

        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value, json!({"title": "Pricing Pages", "comingSoon": true}));
    }

    #[test]
    fn test_complete_item_serializes_flag_false() {
        let study = CaseStudy {
            id: "search".to_string(),
            release: Release::Complete(CaseStudyDetail {
                title: "AI Search".to_string(),
                ..Default::default()
            }),
        };

        let value = serde_json::to_value(&study).unwrap();
        assert_eq!(value["id"], "search");
        assert_eq!(value["title"], "AI Search");
        assert_eq!(value["comingSoon"], false);
    }

    #[test]
    fn test_unknown_enum_values_decode_to_other() {
        let resource: Resource = serde_json::from_value(json!({
            "title": "PRD Template",
            "type": "spreadsheet"
        }))
        .unwrap();
        assert_eq!(resource.detail().unwrap().kind, ResourceKind::Other);

        let article: Article = serde_json::from_value(json!({
            "title": "On Activation",
            "platform": "medium"
        }))
        .unwrap();
        assert_eq!(article.detail().unwrap().platform, Platform::Medium);
    }

    #[test]
    fn test_lookup_by_id() {
        let config: PortfolioConfig = serde_json::from_value(json!({
            "personal": {"name": "Vaibhav"},
            "caseStudies": [{"id": "a", "title": "A"}, {"id": "b", "title": "B"}],
            "makerProjects": [{"id": "tool", "title": "Tool", "github": "https://github.com/x/tool"}],
            "writing": [],
            "resources": []
        }))
        .unwrap();

        assert_eq!(config.case_study("b").unwrap().release.title(), "B");
        assert!(config.case_study("missing").is_none());
        assert_eq!(config.maker_project("tool").unwrap().release.title(), "Tool");
        assert_eq!(config.assets, Assets::default());
    }
}
