//! Card factories and batch renderers shared by the policy and feature pages.
//!
//! The class names produced here are a contract with the site stylesheet and
//! must not change. Each batch render replaces the container's content
//! wholesale; nothing is merged or diffed.

mod records;

pub use records::{
    records_from_json, records_from_value, FeatureRecord, LenientRecord, PolicyRecord,
};

use crate::{
    dom::{Document, Element},
    errors::Error,
};

/// How the factory treats records with absent fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Absent fields render as empty text.
    #[default]
    Lenient,
    /// Absent fields are reported and nothing is rendered.
    Strict,
}

/// Result of a batch render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { count: usize },
    /// No container carries the requested id; the page was not touched.
    MissingContainer,
}

/// Builds a policy card: a numbered badge, a titled heading and a body paragraph.
pub fn create_policy_card(record: &PolicyRecord) -> Element {
    let number = record.number.map(|n| n.to_string()).unwrap_or_default();

    Element::new("div")
        .with_class("card policy-card")
        .with_child(
            Element::new("div")
                .with_class("card-header")
                .with_child(
                    Element::new("div")
                        .with_class("badge-circle policy-number")
                        .with_text(number),
                )
                .with_child(
                    Element::new("h3")
                        .with_class("card-title")
                        .with_text(record.title.clone().unwrap_or_default()),
                ),
        )
        .with_child(
            Element::new("p")
                .with_class("card-content")
                .with_text(record.content.clone().unwrap_or_default()),
        )
}

/// Builds a feature card. Unlike policy cards the heading and paragraph carry
/// no class of their own.
pub fn create_feature_card(record: &FeatureRecord) -> Element {
    Element::new("div")
        .with_class("card feature-card")
        .with_child(
            Element::new("div")
                .with_class("card-header")
                .with_child(
                    Element::new("div")
                        .with_class("feature-icon")
                        .with_text(record.icon.clone().unwrap_or_default()),
                )
                .with_child(Element::new("h3").with_text(record.title.clone().unwrap_or_default())),
        )
        .with_child(Element::new("p").with_text(record.content.clone().unwrap_or_default()))
}

/// Replaces the content of `container_id` with one policy card per record.
///
/// # Errors
///
/// Returns [`Error::Dom`] if the host failed to insert the cards. A missing
/// container is not an error.
pub fn render_policy_cards(
    document: &impl Document,
    container_id: &str,
    records: &[PolicyRecord],
) -> Result<RenderOutcome, Error> {
    let cards: Vec<Element> = records.iter().map(create_policy_card).collect();
    mount(document, container_id, &cards)
}

/// Replaces the content of `container_id` with one feature card per record.
///
/// # Errors
///
/// Returns [`Error::Dom`] if the host failed to insert the cards.
pub fn render_feature_cards(
    document: &impl Document,
    container_id: &str,
    records: &[FeatureRecord],
) -> Result<RenderOutcome, Error> {
    let cards: Vec<Element> = records.iter().map(create_feature_card).collect();
    mount(document, container_id, &cards)
}

fn mount(
    document: &impl Document,
    container_id: &str,
    cards: &[Element],
) -> Result<RenderOutcome, Error> {
    if document.replace_children(container_id, cards)? {
        tracing::debug!(container = container_id, count = cards.len(), "rendered cards");
        Ok(RenderOutcome::Rendered { count: cards.len() })
    } else {
        tracing::debug!(container = container_id, "container not found, skipping render");
        Ok(RenderOutcome::MissingContainer)
    }
}

/// Card factory with a configurable [`Strictness`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CardFactory {
    strictness: Strictness,
}

impl CardFactory {
    pub fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// # Errors
    ///
    /// In strict mode, returns [`Error::MissingField`] for an incomplete record.
    pub fn policy_card(&self, record: &PolicyRecord) -> Result<Element, Error> {
        self.check("policy", 0, record.missing_field())?;
        Ok(create_policy_card(record))
    }

    /// # Errors
    ///
    /// In strict mode, returns [`Error::MissingField`] for an incomplete record.
    pub fn feature_card(&self, record: &FeatureRecord) -> Result<Element, Error> {
        self.check("feature", 0, record.missing_field())?;
        Ok(create_feature_card(record))
    }

    /// Renders policy cards after validating every record; on error the
    /// container is left untouched. A missing container is skipped before
    /// any validation.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`Error::MissingField`] for the first incomplete
    /// record; [`Error::Dom`] if the host failed to insert the cards.
    pub fn render_policy_cards(
        &self,
        document: &impl Document,
        container_id: &str,
        records: &[PolicyRecord],
    ) -> Result<RenderOutcome, Error> {
        if !document.has_container(container_id) {
            return Ok(RenderOutcome::MissingContainer);
        }
        for (index, record) in records.iter().enumerate() {
            self.check("policy", index, record.missing_field())?;
        }
        render_policy_cards(document, container_id, records)
    }

    /// Feature-card counterpart of [`CardFactory::render_policy_cards`].
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`Error::MissingField`] for the first incomplete
    /// record; [`Error::Dom`] if the host failed to insert the cards.
    pub fn render_feature_cards(
        &self,
        document: &impl Document,
        container_id: &str,
        records: &[FeatureRecord],
    ) -> Result<RenderOutcome, Error> {
        if !document.has_container(container_id) {
            return Ok(RenderOutcome::MissingContainer);
        }
        for (index, record) in records.iter().enumerate() {
            self.check("feature", index, record.missing_field())?;
        }
        render_feature_cards(document, container_id, records)
    }

    fn check(
        &self,
        card: &'static str,
        index: usize,
        missing: Option<&'static str>,
    ) -> Result<(), Error> {
        match (self.strictness, missing) {
            (Strictness::Strict, Some(field)) => {
                tracing::warn!(card, index, field, "rejecting incomplete card record");
                Err(Error::MissingField { card, index, field })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    fn header(card: &Element) -> &Element {
        &card.children()[0]
    }

    #[test]
    fn policy_card_has_the_published_structure() {
        let card = create_policy_card(&PolicyRecord::new(3, "Refunds", "Within 30 days."));

        assert_eq!(card.tag(), "div");
        assert_eq!(card.class_name(), "card policy-card");
        assert_eq!(card.children().len(), 2);

        let header = header(&card);
        assert_eq!(header.class_name(), "card-header");
        let badge = &header.children()[0];
        assert_eq!(badge.class_name(), "badge-circle policy-number");
        assert_eq!(badge.text(), Some("3"));
        let heading = &header.children()[1];
        assert_eq!(heading.tag(), "h3");
        assert_eq!(heading.class_name(), "card-title");
        assert_eq!(heading.text(), Some("Refunds"));

        let body = &card.children()[1];
        assert_eq!(body.tag(), "p");
        assert_eq!(body.class_name(), "card-content");
        assert_eq!(body.text(), Some("Within 30 days."));
    }

    #[test]
    fn feature_card_uses_icon_and_unstyled_heading() {
        let card = create_feature_card(&FeatureRecord::new("🎧", "Studio", "Lossless."));

        assert_eq!(card.class_name(), "card feature-card");
        let header = header(&card);
        assert_eq!(header.children()[0].class_name(), "feature-icon");
        assert_eq!(header.children()[0].text(), Some("🎧"));
        assert!(header.children()[1].classes().is_empty());
        assert!(card.children()[1].classes().is_empty());
        assert_eq!(card.text_content(), "🎧StudioLossless.");
    }

    #[test]
    fn markup_in_fields_stays_literal() {
        let card = create_policy_card(&PolicyRecord::new(1, "<b>x</b>", "<script>y</script>"));

        assert_eq!(header(&card).children()[1].text(), Some("<b>x</b>"));
        assert!(card.outer_html().contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(!card.outer_html().contains("<b>"));
    }

    #[test]
    fn missing_fields_render_blank() {
        let card = create_policy_card(&PolicyRecord::default());

        assert_eq!(header(&card).children()[0].text(), Some(""));
        assert_eq!(card.text_content(), "");
    }

    #[test]
    fn negative_numbers_keep_their_sign() {
        let card = create_policy_card(&PolicyRecord::new(-2, "t", "c"));
        assert_eq!(header(&card).children()[0].text(), Some("-2"));
    }

    #[test]
    fn strict_factory_rejects_before_touching_the_container() {
        let document = MemoryDocument::new();
        document.add_container_with("policies", vec![Element::new("span")]);
        let factory = CardFactory::new(Strictness::Strict);
        let records = vec![
            PolicyRecord::new(1, "ok", "ok"),
            PolicyRecord {
                number: Some(2),
                title: None,
                content: Some("c".to_string()),
            },
        ];

        let err = factory
            .render_policy_cards(&document, "policies", &records)
            .expect_err("second record is incomplete");

        assert!(matches!(
            err,
            Error::MissingField {
                card: "policy",
                index: 1,
                field: "title"
            }
        ));
        assert_eq!(document.children("policies"), Some(vec![Element::new("span")]));
    }

    #[test]
    fn lenient_factory_renders_incomplete_records() {
        let document = MemoryDocument::new();
        document.add_container("features");
        let factory = CardFactory::default();

        let outcome = factory
            .render_feature_cards(&document, "features", &[FeatureRecord::default()])
            .expect("lenient never fails");

        assert_eq!(outcome, RenderOutcome::Rendered { count: 1 });
        assert!(factory.feature_card(&FeatureRecord::default()).is_ok());
    }

    #[test]
    fn strict_single_card_reports_missing_icon() {
        let factory = CardFactory::new(Strictness::Strict);
        let err = factory
            .feature_card(&FeatureRecord {
                icon: None,
                title: Some("t".to_string()),
                content: Some("c".to_string()),
            })
            .expect_err("icon is missing");
        assert_eq!(err.to_string(), "feature card #0 is missing field `icon`");
    }

    #[test]
    fn strict_factory_skips_missing_container_before_validating() {
        let document = MemoryDocument::new();
        let factory = CardFactory::new(Strictness::Strict);

        let outcome = factory
            .render_policy_cards(&document, "nowhere", &[PolicyRecord::default()])
            .expect("missing container is silent");

        assert_eq!(outcome, RenderOutcome::MissingContainer);
    }

    #[test]
    fn host_failure_is_reported_not_mistaken_for_missing_container() {
        let document = MemoryDocument::new();
        document.add_container("policies");
        document.set_failing(true);

        let err = render_policy_cards(&document, "policies", &[PolicyRecord::new(1, "t", "c")])
            .expect_err("host rejects insertion");

        assert!(matches!(err, Error::Dom(_)));
        assert_eq!(document.children("policies"), Some(Vec::new()));
    }

    #[test]
    fn page_json_with_wrong_types_renders_without_error() {
        let document = MemoryDocument::new();
        document.add_container("policies");
        let records: Vec<PolicyRecord> =
            records_from_json(r#"[{"number": "3", "title": 42}, {"number": 1.5, "content": "c"}]"#)
                .expect("valid json text");

        let outcome = render_policy_cards(&document, "policies", &records).expect("renders");

        assert_eq!(outcome, RenderOutcome::Rendered { count: 2 });
        let cards = document.children("policies").expect("container exists");
        assert_eq!(cards[0].text_content(), "342");
        assert_eq!(cards[1].text_content(), "c");
    }
}
