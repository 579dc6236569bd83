//! Extraction record schemas for the two active document types (§4.4:
//! "Each active document type has a distinct, fixed output schema... The
//! exact schemas are implementation artifacts; the invariant is that
//! extraction output is schema-validated and either returned whole or
//! `null`").

use serde::{Deserialize, Serialize};

/// A single tariff line on an Entry Print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPrintLineItem {
    pub line_number: u32,
    pub tariff_classification_code: String,
    pub statistical_code: String,
    pub goods_description: String,
    pub quantity: f64,
    pub unit_of_quantity: String,
    pub unit_price: f64,
    pub line_value: f64,
    pub country_of_origin: String,
    pub preference_scheme_code: Option<String>,
    pub duty_rate: f64,
    pub duty_amount: f64,
    pub gst_amount: f64,
    pub treatment_code: Option<String>,
}

/// Entry Print header-level fields plus nested line items (§4.4: "a
/// 70+-field record with nested line-items carrying HS codes and
/// statistical codes").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPrintRecord {
    pub entry_number: String,
    pub entry_type: String,
    pub declaration_date: String,
    pub mode_of_transport: String,
    pub port_of_loading: String,
    pub port_of_discharge: String,
    pub vessel_name: Option<String>,
    pub voyage_number: Option<String>,
    pub bill_of_lading_number: String,
    pub container_numbers: Vec<String>,
    pub importer_name: String,
    pub importer_identifier: String,
    pub importer_address: String,
    pub exporter_name: String,
    pub exporter_address: String,
    pub supplier_name: String,
    pub country_of_origin: String,
    pub country_of_export: String,
    pub country_of_final_destination: String,
    pub currency_code: String,
    pub total_invoice_value: f64,
    pub total_customs_value: f64,
    pub total_freight: f64,
    pub total_insurance: f64,
    pub total_other_costs: f64,
    pub exchange_rate: f64,
    pub gross_weight_kg: f64,
    pub net_weight_kg: f64,
    pub number_of_packages: u32,
    pub package_type: String,
    pub marks_and_numbers: Option<String>,
    pub free_on_board_value: f64,
    pub cost_insurance_freight_value: f64,
    pub customs_broker_name: Option<String>,
    pub customs_broker_license_number: Option<String>,
    pub warehouse_number: Option<String>,
    pub biosecurity_status: Option<String>,
    pub treatment_required: Option<String>,
    pub gst_exemption_code: Option<String>,
    pub concession_code: Option<String>,
    pub valuation_method: String,
    pub related_party_transaction: bool,
    pub duty_payable: f64,
    pub gst_payable: f64,
    pub total_payable: f64,
    pub line_items: Vec<EntryPrintLineItem>,
}

/// A single line on a Commercial Invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommercialInvoiceLineItem {
    pub line_number: u32,
    pub description: String,
    pub quantity: f64,
    pub unit_of_measure: String,
    pub unit_price: f64,
    pub line_total: f64,
    pub country_of_origin: String,
    pub hs_code: Option<String>,
}

/// Commercial Invoice header-level fields plus nested line items (§4.4:
/// "a 25+-field record with nested line-items carrying descriptions,
/// quantities, unit prices, and country of origin").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommercialInvoiceRecord {
    pub invoice_number: String,
    pub invoice_date: String,
    pub seller_name: String,
    pub seller_address: String,
    pub buyer_name: String,
    pub buyer_address: String,
    pub consignee_name: Option<String>,
    pub consignee_address: Option<String>,
    pub incoterm: String,
    pub currency_code: String,
    pub payment_terms: Option<String>,
    pub country_of_origin: String,
    pub country_of_export: String,
    pub port_of_loading: Option<String>,
    pub port_of_discharge: Option<String>,
    pub total_quantity: f64,
    pub total_net_weight_kg: Option<f64>,
    pub total_gross_weight_kg: Option<f64>,
    pub total_invoice_value: f64,
    pub freight_charges: Option<f64>,
    pub insurance_charges: Option<f64>,
    pub other_charges: Option<f64>,
    pub line_items: Vec<CommercialInvoiceLineItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_print_record_round_trips_through_json() {
        let record = EntryPrintRecord {
            entry_number: "E123".to_string(),
            entry_type: "Import".to_string(),
            declaration_date: "2026-01-01".to_string(),
            mode_of_transport: "Sea".to_string(),
            port_of_loading: "Shanghai".to_string(),
            port_of_discharge: "Sydney".to_string(),
            vessel_name: Some("MSC Example".to_string()),
            voyage_number: Some("123W".to_string()),
            bill_of_lading_number: "BOL1".to_string(),
            container_numbers: vec!["CONT1".to_string()],
            importer_name: "Acme".to_string(),
            importer_identifier: "ABN123".to_string(),
            importer_address: "1 Example St".to_string(),
            exporter_name: "Example Exports".to_string(),
            exporter_address: "2 Example St".to_string(),
            supplier_name: "Example Supplier".to_string(),
            country_of_origin: "CN".to_string(),
            country_of_export: "CN".to_string(),
            country_of_final_destination: "AU".to_string(),
            currency_code: "USD".to_string(),
            total_invoice_value: 1000.0,
            total_customs_value: 1000.0,
            total_freight: 50.0,
            total_insurance: 10.0,
            total_other_costs: 0.0,
            exchange_rate: 1.5,
            gross_weight_kg: 100.0,
            net_weight_kg: 90.0,
            number_of_packages: 5,
            package_type: "Carton".to_string(),
            marks_and_numbers: None,
            free_on_board_value: 950.0,
            cost_insurance_freight_value: 1010.0,
            customs_broker_name: None,
            customs_broker_license_number: None,
            warehouse_number: None,
            biosecurity_status: None,
            treatment_required: None,
            gst_exemption_code: None,
            concession_code: None,
            valuation_method: "Transaction value".to_string(),
            related_party_transaction: false,
            duty_payable: 50.0,
            gst_payable: 100.0,
            total_payable: 150.0,
            line_items: vec![EntryPrintLineItem {
                line_number: 1,
                tariff_classification_code: "8471.30.00".to_string(),
                statistical_code: "00".to_string(),
                goods_description: "Laptop".to_string(),
                quantity: 10.0,
                unit_of_quantity: "EA".to_string(),
                unit_price: 100.0,
                line_value: 1000.0,
                country_of_origin: "CN".to_string(),
                preference_scheme_code: None,
                duty_rate: 0.05,
                duty_amount: 50.0,
                gst_amount: 100.0,
                treatment_code: None,
            }],
        };

        let json = serde_json::to_string(&record).unwrap();
        let round_tripped: EntryPrintRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(round_tripped, record);
    }
}
