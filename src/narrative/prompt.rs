//! Prompt construction for the market commentary.

use crate::domain::PropertyFeatures;
use crate::report::{format_currency, location_label};

/// Build the analyst prompt for a valued property.
///
/// Every feature value and the currency-formatted price are embedded.
pub fn build_prompt(point_estimate: u64, features: &PropertyFeatures) -> String {
    let mut prompt = String::new();

    prompt.push_str("Act as a professional real estate analyst.\n");
    prompt.push_str("Analyze the following house valuation:\n");
    prompt.push_str(&format!("- Estimated Price: {}\n", format_currency(point_estimate)));
    prompt.push_str(&format!("- Square Footage: {} sqft\n", features.living_area_sqft));
    prompt.push_str(&format!(
        "- Bedrooms/Bathrooms: {}/{}\n",
        features.bedrooms, features.bathrooms
    ));
    prompt.push_str(&format!("- Construction Grade (1-13): {}\n", features.grade));
    prompt.push_str(&format!("- Condition (1-5): {}\n", features.condition));
    prompt.push_str(&format!("- Location Zipcode: {}\n", location_label(&features.zip_code)));
    prompt.push_str(&format!("- Year Built: {}\n", features.year_built));
    if let Some(year) = features.year_renovated {
        prompt.push_str(&format!("- Year Renovated: {year}\n"));
    }

    prompt.push_str(
        "\nProvide a concise (3-4 paragraph) expert opinion on:\n\
         1. Whether this price seems realistic for the current market.\n\
         2. How the specific features (like grade or location) are likely impacting this valuation.\n\
         3. Suggested renovations or upgrades that could yield the highest return on investment for this property profile.\n\
         4. A brief outlook on the real estate market in a similar area.\n\
         \n\
         Use a professional yet accessible tone. Use markdown formatting.\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_price_and_every_feature() {
        let features = PropertyFeatures {
            year_renovated: Some(2015),
            ..Default::default()
        };
        let prompt = build_prompt(1_663_200, &features);

        assert!(prompt.contains("$1,663,200"));
        assert!(prompt.contains("2200 sqft"));
        assert!(prompt.contains("3/2.5"));
        assert!(prompt.contains("Grade (1-13): 7"));
        assert!(prompt.contains("Condition (1-5): 3"));
        assert!(prompt.contains("98103 (Seattle Central)"));
        assert!(prompt.contains("Year Built: 1995"));
        assert!(prompt.contains("Year Renovated: 2015"));
    }

    #[test]
    fn renovation_line_is_omitted_when_absent() {
        let prompt = build_prompt(500_000, &PropertyFeatures::default());
        assert!(!prompt.contains("Renovated"));
    }
}
