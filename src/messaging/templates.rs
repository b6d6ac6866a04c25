//! Message bodies rendered from embedded Tera templates

use miette::Diagnostic;
use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;
use thiserror::Error;

use crate::entities::{Contact, PurchaseOrder};
use crate::messaging::format_money;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const PO_EMAIL: &str = "po_email.txt.tera";
const PO_WHATSAPP: &str = "po_whatsapp.txt.tera";
const LEADERBOARD_WHATSAPP: &str = "leaderboard_whatsapp.txt.tera";

#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    #[diagnostic(code(baskit::messaging::template_missing))]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    #[diagnostic(code(baskit::messaging::template_render))]
    RenderError(#[from] tera::Error),
}

/// Settings shared by every rendered message
#[derive(Debug, Clone)]
pub struct MessageContext {
    /// Sender name used for the signature
    pub author: String,
    pub currency: String,
    pub buyer_email: Option<String>,
}

/// One member's standing, as told to them
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardNotice {
    pub member_name: String,
    pub board_title: String,
    pub rank: usize,
    pub points: u32,
    pub receipts: usize,

    /// Points behind the next better rank, 0 for the leader
    pub gap: u32,
}

#[derive(Serialize)]
struct LineView {
    product: String,
    matched_product: String,
    quantity: u32,
    unit: String,
    unit_price: String,
    line_total: String,
}

/// Renders PO and loyalty messages
pub struct MessageRenderer {
    tera: Tera,
}

impl MessageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let name = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(name) {
                let template_str = std::str::from_utf8(content.data.as_ref())
                    .map_err(|_| TemplateError::NotFound(name.to_string()))?;
                tera.add_raw_template(name, template_str)?;
            }
        }

        Ok(Self { tera })
    }

    fn require(&self, name: &str) -> Result<(), TemplateError> {
        if self.tera.get_template_names().any(|n| n == name) {
            Ok(())
        } else {
            Err(TemplateError::NotFound(name.to_string()))
        }
    }

    fn po_context(&self, po: &PurchaseOrder, contact: &Contact, ctx: &MessageContext) -> tera::Context {
        let lines: Vec<LineView> = po
            .lines
            .iter()
            .map(|line| LineView {
                product: line.product.clone(),
                matched_product: line.matched_product.clone(),
                quantity: line.quantity,
                unit: line.unit.clone().unwrap_or_else(|| "pcs".to_string()),
                unit_price: format_money(line.unit_price, &ctx.currency),
                line_total: format_money(line.line_total, &ctx.currency),
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("po_id", &po.id.to_string());
        context.insert("supplier_name", &po.supplier_name);
        context.insert("contact_name", &contact.name);
        context.insert("lines", &lines);
        context.insert("total", &format_money(po.total, &ctx.currency));
        context.insert("unmatched", &po.unmatched);
        context.insert("buyer_email", &ctx.buyer_email);
        context.insert("author", &ctx.author);
        context
    }

    /// Subject and body of the email sent to the supplier
    pub fn po_email(
        &self,
        po: &PurchaseOrder,
        contact: &Contact,
        ctx: &MessageContext,
    ) -> Result<(String, String), TemplateError> {
        self.require(PO_EMAIL)?;
        let body = self
            .tera
            .render(PO_EMAIL, &self.po_context(po, contact, ctx))?;
        let subject = format!("Purchase order {} - {}", po.id, po.supplier_name);
        Ok((subject, body))
    }

    /// Short WhatsApp version of a PO
    pub fn po_whatsapp(
        &self,
        po: &PurchaseOrder,
        contact: &Contact,
        ctx: &MessageContext,
    ) -> Result<String, TemplateError> {
        self.require(PO_WHATSAPP)?;
        Ok(self
            .tera
            .render(PO_WHATSAPP, &self.po_context(po, contact, ctx))?
            .trim_end()
            .to_string())
    }

    /// Leaderboard standing message for one member
    pub fn leaderboard_whatsapp(&self, notice: &LeaderboardNotice) -> Result<String, TemplateError> {
        self.require(LEADERBOARD_WHATSAPP)?;
        let context = tera::Context::from_serialize(notice)?;
        Ok(self
            .tera
            .render(LEADERBOARD_WHATSAPP, &context)?
            .trim_end()
            .to_string())
    }
}
