// case-insensitive approximate substring matching, scored by edits per term char

/// Smallest edit distance between `pattern` and any substring of `text`.
pub fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    if pattern.is_empty() {
        return 0;
    }
    // column over the pattern; row 0 is free so a match may start anywhere
    let mut prev: Vec<usize> = (0..=pattern.len()).collect();
    let mut best = pattern.len();
    for t in text {
        let mut cur = vec![0; pattern.len() + 1];
        for (i, p) in pattern.iter().enumerate() {
            let substitute = prev[i] + if p == t { 0 } else { 1 };
            cur[i + 1] = substitute.min(prev[i + 1] + 1).min(cur[i] + 1);
        }
        best = best.min(cur[pattern.len()]);
        prev = cur;
    }
    best
}

fn chars(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Score of `term` against `name`, `None` above the threshold.
pub fn term_score(term: &[char], name: &[char], threshold: f64) -> Option<f64> {
    if term.is_empty() {
        return Some(0.0);
    }
    let score = substring_distance(term, name) as f64 / term.len() as f64;
    if score <= threshold + f64::EPSILON {
        Some(score)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// position of the name in the indexed list
    pub index: usize,
    pub score: f64,
}

pub struct Index {
    names: Vec<Vec<char>>,
    threshold: f64,
    limit: usize,
}

impl Index {
    pub fn new<'a, I>(names: I, threshold: f64, limit: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Index {
            names: names.into_iter().map(chars).collect(),
            threshold,
            limit,
        }
    }

    /// Names matched by every term, best mean score first, capped at the limit.
    pub fn search(&self, terms: &[&str]) -> Vec<Hit> {
        if terms.is_empty() {
            return Vec::new();
        }
        let terms: Vec<Vec<char>> = terms.iter().map(|t| chars(t)).collect();
        let mut hits: Vec<Hit> = self
            .names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                let mut total = 0.0;
                for term in &terms {
                    total += term_score(term, name, self.threshold)?;
                }
                Some(Hit {
                    index,
                    score: total / terms.len() as f64,
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        hits.truncate(self.limit);
        hits
    }
}
