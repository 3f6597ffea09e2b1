// Ingredient Filtering
//
// *Le Filtre* (The Filter) - Multi-term conjunctive matching over ingredient text

use crate::recipe::{FilteredSubset, RecipeRecord};
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// How ingredient terms are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Terms are pattern fragments (`chick.n` matches "chicken")
    #[default]
    Pattern,

    /// Terms are plain text and always valid
    Literal,
}

/// Ordered set of ingredient terms a recipe must contain
///
/// Terms are trimmed; blank terms and repeats are dropped, keeping the
/// first occurrence. An empty query matches every recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientQuery {
    terms: Vec<String>,

    #[serde(default)]
    mode: MatchMode,
}

impl IngredientQuery {
    /// Create a query whose terms are pattern fragments
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() || unique.iter().any(|t| t == term) {
                continue;
            }
            unique.push(term.to_string());
        }

        Self {
            terms: unique,
            mode: MatchMode::Pattern,
        }
    }

    /// Create a query whose terms are matched as plain text
    pub fn literal<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(terms).with_mode(MatchMode::Literal)
    }

    /// Parse `;`-separated terms, e.g. `"chicken;rice"`
    pub fn parse_delimited(text: &str) -> Self {
        Self::new(text.split(';'))
    }

    /// Change how terms are interpreted
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Terms in order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Matching mode
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Check if the query has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// A single "contains term" check
#[derive(Debug, Clone)]
enum TermPredicate {
    /// Lowercased literal substring
    Literal(String),

    /// Case-insensitive pattern
    Pattern(Regex),
}

impl TermPredicate {
    fn matches(&self, text: &str, lowered: &str) -> bool {
        match self {
            TermPredicate::Literal(term) => lowered.contains(term.as_str()),
            TermPredicate::Pattern(regex) => regex.is_match(text),
        }
    }
}

/// Compiled conjunction of term predicates
#[derive(Debug, Clone)]
pub struct IngredientFilter {
    predicates: Vec<TermPredicate>,

    /// Any literal predicate present
    lowercase_text: bool,
}

impl IngredientFilter {
    /// Compile every term of a query
    ///
    /// # Returns
    ///
    /// `Err(Error::InvalidTerm)` for the first pattern term that does not compile
    pub fn compile(query: &IngredientQuery) -> Result<Self, Error> {
        let predicates = query
            .terms()
            .iter()
            .map(|term| match query.mode() {
                MatchMode::Literal => Ok(TermPredicate::Literal(term.to_lowercase())),
                MatchMode::Pattern => RegexBuilder::new(term)
                    .case_insensitive(true)
                    .build()
                    .map(TermPredicate::Pattern)
                    .map_err(|e| Error::InvalidTerm {
                        term: term.clone(),
                        reason: e.to_string(),
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let lowercase_text = predicates
            .iter()
            .any(|p| matches!(p, TermPredicate::Literal(_)));

        Ok(Self {
            predicates,
            lowercase_text,
        })
    }

    /// Check whether `text` contains every term
    pub fn matches(&self, text: &str) -> bool {
        if self.predicates.is_empty() {
            return true;
        }
        let lowered = if self.lowercase_text {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };
        self.predicates.iter().all(|p| p.matches(text, &lowered))
    }

    /// Check a recipe's ingredient text
    pub fn matches_recipe(&self, recipe: &RecipeRecord) -> bool {
        self.matches(&recipe.ingredients_raw)
    }

    /// Keep the rows that match, in order
    pub fn apply<'a>(&self, subset: &FilteredSubset<'a>) -> FilteredSubset<'a> {
        FilteredSubset::from_rows(
            subset
                .iter()
                .copied()
                .filter(|recipe| self.matches_recipe(recipe))
                .collect(),
        )
    }
}

/// Reduce a subset to recipes whose ingredients contain all query terms
///
/// An empty query returns the input unchanged. A term that cannot be
/// compiled is logged and the unfiltered input is returned.
pub fn filter_by_ingredients<'a>(
    subset: &FilteredSubset<'a>,
    query: &IngredientQuery,
) -> FilteredSubset<'a> {
    if query.is_empty() {
        debug!("No ingredients specified, keeping all {} rows", subset.len());
        return subset.clone();
    }

    match IngredientFilter::compile(query) {
        Ok(filter) => {
            let filtered = filter.apply(subset);
            info!(
                "Filtered {} rows to {} with terms {:?}",
                subset.len(),
                filtered.len(),
                query.terms()
            );
            filtered
        }
        Err(e) => {
            warn!("Ingredient filtering failed, returning unfiltered data: {}", e);
            subset.clone()
        }
    }
}

/// Ingredient filter errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A term is not a valid pattern
    #[error("Invalid ingredient term '{term}': {reason}")]
    InvalidTerm {
        /// Offending term
        term: String,
        /// Pattern compiler message
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::fixtures::record;
    use crate::recipe::Catalog;
    use rstest::rstest;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            record("salad", r#"["chicken breast", "lettuce", "tomatoes"]"#, [0.0; 9]),
            record("pasta", r#"["pasta", "tomatoes", "basil"]"#, [0.0; 9]),
            record("stir fry", r#"["Beef", "soy sauce", "ginger"]"#, [0.0; 9]),
        ])
    }

    fn names(subset: &FilteredSubset<'_>) -> Vec<String> {
        subset.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_query_dedup_and_trim() {
        let query = IngredientQuery::new(["rice", " rice ", "", "beef", "rice"]);
        assert_eq!(query.terms(), &["rice".to_string(), "beef".to_string()]);
        assert_eq!(query.mode(), MatchMode::Pattern);
    }

    #[test]
    fn test_query_parse_delimited() {
        let query = IngredientQuery::parse_delimited("chicken; rice;;");
        assert_eq!(query.terms(), &["chicken".to_string(), "rice".to_string()]);
        assert!(IngredientQuery::parse_delimited("").is_empty());
    }

    #[rstest]
    #[case(&[], &["salad", "pasta", "stir fry"])]
    #[case(&["tomatoes"], &["salad", "pasta"])]
    #[case(&["TOMATOES", "basil"], &["pasta"])]
    #[case(&["beef"], &["stir fry"])]
    #[case(&["tomatoes", "ginger"], &[])]
    #[case(&["chick.n"], &["salad"])]
    #[case(&["zzznomatch"], &[])]
    fn test_filter_conjunction(#[case] terms: &[&str], #[case] expected: &[&str]) {
        let catalog = catalog();
        let filtered = filter_by_ingredients(&catalog.subset(), &IngredientQuery::new(terms));
        assert_eq!(names(&filtered), expected);
    }

    #[test]
    fn test_substring_match_is_not_list_aware() {
        // "ice" matches inside "rice" and "juice"
        let catalog = Catalog::new(vec![record("r", r#"["rice"]"#, [0.0; 9])]);
        let filtered = filter_by_ingredients(&catalog.subset(), &IngredientQuery::new(["ice"]));
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_fails_open() {
        let catalog = catalog();
        let query = IngredientQuery::new(["tomatoes", "(unclosed"]);
        assert!(IngredientFilter::compile(&query).is_err());

        let filtered = filter_by_ingredients(&catalog.subset(), &query);
        assert_eq!(filtered.len(), catalog.len());
    }

    #[test]
    fn test_literal_mode_escapes_terms() {
        let catalog = Catalog::new(vec![
            record("a", r#"["(unclosed thing"]"#, [0.0; 9]),
            record("b", r#"["chicken"]"#, [0.0; 9]),
        ]);
        let filtered =
            filter_by_ingredients(&catalog.subset(), &IngredientQuery::literal(["(UNCLOSED"]));
        assert_eq!(names(&filtered), vec!["a"]);

        let filtered =
            filter_by_ingredients(&catalog.subset(), &IngredientQuery::literal(["chick.n"]));
        assert!(filtered.is_empty());
    }

    #[rstest]
    #[case(IngredientQuery::new(["tomatoes"]), false)]
    #[case(IngredientQuery::literal(["tomatoes"]), true)]
    #[case(IngredientQuery::default(), false)]
    fn test_lowercases_only_for_literal_terms(
        #[case] query: IngredientQuery,
        #[case] lowercase: bool,
    ) {
        let filter = IngredientFilter::compile(&query).unwrap();
        assert_eq!(filter.lowercase_text, lowercase);
        assert!(filter.matches(r#"["TOMATOES"]"#));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = catalog();
        let query = IngredientQuery::new(["tomato", "tomatoes", "toma"]);
        let once = filter_by_ingredients(&catalog.subset(), &query);
        let twice = filter_by_ingredients(&once, &query);
        assert_eq!(once, twice);
        assert_eq!(names(&once), vec!["salad", "pasta"]);
    }
}
