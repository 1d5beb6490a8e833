//! Prompts for the four plating styles.

use galley_core::PlatingMethod;

/// Visual direction for one plating style.
pub fn plating_direction(method: PlatingMethod) -> &'static str {
    match method {
        PlatingMethod::Classic => {
            "classic plating: protein at the center, starch and vegetables arranged neatly around it, sauce spooned alongside on a round white plate"
        }
        PlatingMethod::Stacking => {
            "stacked plating: components built vertically into a tall, tidy tower at the center of the plate, sauce pooled at the base"
        }
        PlatingMethod::Landscape => {
            "landscape plating: components laid out in a natural, flowing arrangement across a wide plate like a scene, with garnishes placed organically"
        }
        PlatingMethod::Deconstructed => {
            "deconstructed plating: each component presented separately with deliberate negative space so every element is individually visible"
        }
    }
}

/// Image prompt for `dish_name` plated in `method`.
///
/// # Example
///
/// ```
/// use galley::plating_prompt;
/// use galley_core::PlatingMethod;
///
/// let ingredients = vec!["duck breast".to_string(), "cherries".to_string()];
/// let prompt = plating_prompt(PlatingMethod::Stacking, "Duck a l'orange", &ingredients, None);
/// assert!(prompt.contains("Duck a l'orange"));
/// assert!(prompt.contains("duck breast, cherries"));
/// assert!(prompt.contains("stacked plating"));
/// ```
pub fn plating_prompt(
    method: PlatingMethod,
    dish_name: &str,
    ingredients: &[String],
    instructions: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Professional restaurant food photography of {}, {}.",
        dish_name.trim(),
        plating_direction(method)
    );

    let ingredients: Vec<&str> = ingredients
        .iter()
        .map(|ingredient| ingredient.trim())
        .filter(|ingredient| !ingredient.is_empty())
        .collect();
    if !ingredients.is_empty() {
        prompt.push_str(&format!(" Visible ingredients: {}.", ingredients.join(", ")));
    }

    if let Some(instructions) = instructions.map(str::trim).filter(|text| !text.is_empty()) {
        prompt.push_str(&format!(" Chef's notes: {}.", instructions.trim_end_matches('.')));
    }

    prompt.push_str(" Soft natural light, shallow depth of field, high detail, no text or watermarks.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_method_gets_a_distinct_prompt() {
        let prompts: std::collections::HashSet<String> = PlatingMethod::iter()
            .map(|method| plating_prompt(method, "Ratatouille", &[], None))
            .collect();
        assert_eq!(prompts.len(), 4);
    }

    #[test]
    fn blank_ingredients_and_notes_are_skipped() {
        let prompt = plating_prompt(
            PlatingMethod::Classic,
            "Steak frites",
            &[" ".to_string()],
            Some(" "),
        );
        assert!(!prompt.contains("Visible ingredients"));
        assert!(!prompt.contains("Chef's notes"));
    }

    #[test]
    fn instructions_are_included() {
        let prompt = plating_prompt(
            PlatingMethod::Landscape,
            "Spring pea risotto",
            &["peas".to_string()],
            Some("Garnish with pea shoots."),
        );
        assert!(prompt.contains("Chef's notes: Garnish with pea shoots."));
    }
}
