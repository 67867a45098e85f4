//! Price tag renderer
//!
//! Renders a label's semantic fields into a ZPL command stream for a
//! 4"x2" thermal label (203 dpi). Pure and deterministic: the same label
//! always produces the same bytes.

use rust_decimal::Decimal;
use shared::models::round_cents;
use shared::{Draft, LabelContent};
use tag_printer::{GraphicField, Justify, ZplBuilder};

use super::tier::TierTable;

/// 4" at 203 dpi
pub const LABEL_WIDTH_DOTS: u32 = 812;
/// 2" at 203 dpi
pub const LABEL_HEIGHT_DOTS: u32 = 406;

const MARGIN: u32 = 20;

const NAME_FONT: u32 = 32;
const NAME_MAX_LINES: u32 = 2;

const LOGO_X: u32 = MARGIN;
const LOGO_Y: u32 = 100;
const LOGO_SIZE: u32 = 200;
const LOGO_BORDER: u32 = 4;
const LOGO_CAPTION_FONT: u32 = 30;

const FEATURE_X: u32 = 240;
const FEATURE_BASE_Y: u32 = 100;
const FEATURE_LINE_HEIGHT: u32 = 40;
const FEATURE_FONT: u32 = 26;

const PRICE_BASE_X: i32 = 300;
const PRICE_Y: u32 = 230;

const TAX_X: u32 = 560;
const TAX_Y: u32 = 360;
const TAX_FONT: u32 = 22;
const TAX_CAPTION: &str = "Sales Tax Incl.";

/// Largest logo bitmap that fits the logo slot
pub const LOGO_MAX_DOTS: u32 = LOGO_SIZE;

/// Price tag renderer
#[derive(Debug, Clone, Default)]
pub struct PriceTagRenderer {
    tiers: TierTable,
    logo: Option<GraphicField>,
}

impl PriceTagRenderer {
    pub fn new(tiers: TierTable) -> Self {
        Self { tiers, logo: None }
    }

    /// Embed a pre-converted logo instead of the placeholder box
    pub fn with_logo(mut self, logo: GraphicField) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Render a label to a ZPL command stream
    pub fn render<L: LabelContent + ?Sized>(&self, label: &L) -> String {
        debug_assert!(label.price() >= Decimal::ZERO, "negative price");
        debug_assert!(
            label.features().iter().filter(|f| !f.trim().is_empty()).count()
                <= shared::models::MAX_FEATURES,
            "too many features"
        );

        let mut b = ZplBuilder::new();
        b.start_format()
            .utf8()
            .print_width(LABEL_WIDTH_DOTS)
            .label_length(LABEL_HEIGHT_DOTS);

        self.render_name(&mut b, label.product_name());
        self.render_logo(&mut b);
        self.render_features(&mut b, label.features());
        self.render_price(&mut b, label.price());
        self.render_tax_caption(&mut b);

        b.end_format();
        b.finalize()
    }

    /// Render the live preview of a draft, if anything has been typed
    pub fn render_preview(&self, draft: &Draft) -> Option<String> {
        if draft.is_blank() {
            return None;
        }
        Some(self.render(draft))
    }

    /// Product name, wrapped over at most two lines
    fn render_name(&self, b: &mut ZplBuilder, name: &str) {
        b.origin(MARGIN, MARGIN)
            .font(NAME_FONT, NAME_FONT)
            .field_block(LABEL_WIDTH_DOTS - 2 * MARGIN, NAME_MAX_LINES, Justify::Left)
            .text(name);
    }

    fn render_logo(&self, b: &mut ZplBuilder) {
        match &self.logo {
            Some(logo) => {
                b.origin(LOGO_X, LOGO_Y).graphic(logo);
            }
            None => {
                b.origin(LOGO_X, LOGO_Y)
                    .graphic_box(LOGO_SIZE, LOGO_SIZE, LOGO_BORDER);
                b.origin(LOGO_X, LOGO_Y + (LOGO_SIZE - LOGO_CAPTION_FONT) / 2)
                    .font(LOGO_CAPTION_FONT, LOGO_CAPTION_FONT)
                    .field_block(LOGO_SIZE, 1, Justify::Center)
                    .caption("LOGO");
            }
        }
    }

    /// One line per non-blank feature; blanks leave no gap
    fn render_features(&self, b: &mut ZplBuilder, features: &[String]) {
        let width = LABEL_WIDTH_DOTS - MARGIN - FEATURE_X;
        let lines = features.iter().filter(|f| !f.trim().is_empty());

        for (index, feature) in lines.enumerate() {
            let y = FEATURE_BASE_Y + index as u32 * FEATURE_LINE_HEIGHT;
            b.origin(FEATURE_X, y)
                .font(FEATURE_FONT, FEATURE_FONT)
                .field_block(width, 1, Justify::Left)
                .text(&format!("- {}", feature));
        }
    }

    /// Tier is picked from the printed (rounded) amount
    fn render_price(&self, b: &mut ZplBuilder, price: Decimal) {
        let price = round_cents(price);
        let tier = self.tiers.select(price);
        let x = (PRICE_BASE_X + tier.offset).max(0) as u32;

        b.origin(x, PRICE_Y)
            .font(tier.font_size, tier.font_size)
            .text(&format_price(price));
    }

    fn render_tax_caption(&self, b: &mut ZplBuilder) {
        b.origin(TAX_X, TAX_Y)
            .font(TAX_FONT, TAX_FONT)
            .caption(TAX_CAPTION);
    }
}

/// Encode a label with the standard layout and no logo
pub fn encode<L: LabelContent + ?Sized>(label: &L) -> String {
    PriceTagRenderer::default().render(label)
}

/// `$` + exactly two fraction digits, no grouping, half away from zero
pub fn format_price(price: Decimal) -> String {
    format!("${}", round_cents(price))
}
