//! Canonical order summary shared by the mailer body and the display page.

use serde::Serialize;

/// Display value for any field the upstream record did not provide.
pub const PLACEHOLDER: &str = "--";

pub const LABEL_RETAIL_PRICE: &str = "统一零售价";
pub const LABEL_VIN: &str = "VIN";

/// One fetch cycle's view of an order, with every field ready for display.
///
/// Built once per cycle by the normalizer and never mutated afterwards.
/// `vin` stays optional because its presence drives the notification
/// decision; the configuration fields are `None` when the upstream record
/// carried no configuration sub-object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub requested_at: String,
    pub order_no: String,
    pub business_order_no: String,
    pub order_date: String,
    pub pay_date: String,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub buyer_id_number: String,
    pub city: String,
    pub dealer_name: String,
    pub model: String,
    pub version: String,
    pub color: String,
    pub retail_price: String,
    pub vin: Option<String>,
    pub config_name: Option<String>,
    pub config_price: Option<String>,
}

impl OrderSummary {
    #[must_use]
    pub fn has_vin(&self) -> bool {
        self.vin.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Label/value pairs in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<(&'static str, &str)> {
        let mut lines = vec![
            ("请求时间", self.requested_at.as_str()),
            ("订单号", self.order_no.as_str()),
            ("业务订单号", self.business_order_no.as_str()),
            ("下单时间", self.order_date.as_str()),
            ("支付时间", self.pay_date.as_str()),
            ("购车人", self.buyer_name.as_str()),
            ("联系电话", self.buyer_phone.as_str()),
            ("证件号码", self.buyer_id_number.as_str()),
            ("城市", self.city.as_str()),
            ("经销商", self.dealer_name.as_str()),
            ("车型", self.model.as_str()),
            ("版本", self.version.as_str()),
            ("颜色", self.color.as_str()),
            (LABEL_RETAIL_PRICE, self.retail_price.as_str()),
            (LABEL_VIN, self.vin.as_deref().unwrap_or(PLACEHOLDER)),
        ];

        if self.config_name.is_some() || self.config_price.is_some() {
            lines.push((
                "配置全称",
                self.config_name.as_deref().unwrap_or(PLACEHOLDER),
            ));
            lines.push((
                "配置价格",
                self.config_price.as_deref().unwrap_or(PLACEHOLDER),
            ));
        }

        lines
    }

    /// Plain-text mail body: one `label: value` line per field.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.lines()
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrderSummary {
        OrderSummary {
            requested_at: "2025-03-14 09:00:00".to_string(),
            order_no: "O123".to_string(),
            business_order_no: PLACEHOLDER.to_string(),
            order_date: "2025-01-02".to_string(),
            pay_date: PLACEHOLDER.to_string(),
            buyer_name: "张三".to_string(),
            buyer_phone: PLACEHOLDER.to_string(),
            buyer_id_number: PLACEHOLDER.to_string(),
            city: "广东省 深圳市".to_string(),
            dealer_name: PLACEHOLDER.to_string(),
            model: "Model X".to_string(),
            version: PLACEHOLDER.to_string(),
            color: "白 / 黑".to_string(),
            retail_price: "¥199,999.00".to_string(),
            vin: None,
            config_name: None,
            config_price: None,
        }
    }

    #[test]
    fn lines_use_fixed_order_and_placeholder_for_missing_vin() {
        let summary = sample();
        let lines = summary.lines();
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0], ("请求时间", "2025-03-14 09:00:00"));
        assert_eq!(lines[1], ("订单号", "O123"));
        assert_eq!(lines[13], ("统一零售价", "¥199,999.00"));
        assert_eq!(lines[14], ("VIN", "--"));
        assert!(!summary.has_vin());
    }

    #[test]
    fn configuration_lines_appear_only_when_present() {
        let mut summary = sample();
        summary.config_name = Some("长续航全轮驱动版".to_string());
        let lines = summary.lines();
        assert_eq!(lines.len(), 17);
        assert_eq!(lines[15], ("配置全称", "长续航全轮驱动版"));
        assert_eq!(lines[16], ("配置价格", "--"));
    }

    #[test]
    fn plain_text_joins_label_value_lines() {
        let mut summary = sample();
        summary.vin = Some("LSJA1234567890".to_string());
        let body = summary.to_plain_text();
        assert!(body.starts_with("请求时间: 2025-03-14 09:00:00\n订单号: O123\n"));
        assert!(body.contains("\n统一零售价: ¥199,999.00\n"));
        assert!(body.ends_with("VIN: LSJA1234567890"));
        assert!(summary.has_vin());
    }

    #[test]
    fn serializes_missing_vin_as_null() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["order_no"], "O123");
        assert!(json["vin"].is_null());
    }
}
