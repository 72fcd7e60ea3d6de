// Dictionary and bag-of-words corpus.
//
// Token ids are assigned in first-seen order across the corpus, so the same
// input always produces the same ids.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    token_to_id: HashMap<String, usize>,
    id_to_token: Vec<String>,
    /// Number of documents each token appears in
    doc_freq: Vec<usize>,
}

impl Dictionary {
    pub fn from_documents(texts: &[Vec<String>]) -> Self {
        let mut dictionary = Self::default();
        for tokens in texts {
            dictionary.add_document(tokens);
        }
        dictionary
    }

    /// Register every token of a document, updating document frequencies.
    pub fn add_document(&mut self, tokens: &[String]) {
        let mut seen_in_doc: Vec<usize> = Vec::new();
        for token in tokens {
            let id = match self.token_to_id.get(token) {
                Some(&id) => id,
                None => {
                    let id = self.id_to_token.len();
                    self.id_to_token.push(token.clone());
                    self.token_to_id.insert(token.clone(), id);
                    self.doc_freq.push(0);
                    id
                }
            };
            if !seen_in_doc.contains(&id) {
                seen_in_doc.push(id);
                self.doc_freq[id] += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    pub fn id(&self, token: &str) -> Option<usize> {
        self.token_to_id.get(token).copied()
    }

    pub fn token(&self, id: usize) -> Option<&str> {
        self.id_to_token.get(id).map(String::as_str)
    }

    pub fn tokens(&self) -> &[String] {
        &self.id_to_token
    }

    pub fn doc_frequency(&self, id: usize) -> usize {
        self.doc_freq.get(id).copied().unwrap_or(0)
    }

    /// Convert tokens to `(id, count)` pairs sorted by id. Unknown tokens
    /// are dropped.
    pub fn doc2bow(&self, tokens: &[String]) -> Vec<(usize, u32)> {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for token in tokens {
            if let Some(&id) = self.token_to_id.get(token) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let mut bow: Vec<(usize, u32)> = counts.into_iter().collect();
        bow.sort_unstable_by_key(|&(id, _)| id);
        bow
    }
}

/// A dictionary plus one bag of words per document, in document order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub dictionary: Dictionary,
    pub documents: Vec<Vec<(usize, u32)>>,
}

impl Corpus {
    pub fn from_texts(texts: &[Vec<String>]) -> Self {
        let dictionary = Dictionary::from_documents(texts);
        let documents = texts.iter().map(|t| dictionary.doc2bow(t)).collect();
        Self {
            dictionary,
            documents,
        }
    }

    pub fn num_documents(&self) -> usize {
        self.documents.len()
    }

    /// Token count of each document.
    pub fn document_lengths(&self) -> Vec<u64> {
        self.documents
            .iter()
            .map(|bow| bow.iter().map(|&(_, c)| c as u64).sum())
            .collect()
    }

    /// Corpus-wide count of each token id.
    pub fn term_frequencies(&self) -> Vec<u64> {
        let mut freqs = vec![0u64; self.dictionary.len()];
        for bow in &self.documents {
            for &(id, count) in bow {
                freqs[id] += count as u64;
            }
        }
        freqs
    }

    pub fn num_tokens(&self) -> u64 {
        self.document_lengths().iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts() -> Vec<Vec<String>> {
        vec![
            vec!["python", "lista", "python"],
            vec![],
            vec!["lista", "tabla"],
        ]
        .into_iter()
        .map(|doc| doc.into_iter().map(String::from).collect())
        .collect()
    }

    #[test]
    fn test_ids_in_first_seen_order() {
        let dict = Dictionary::from_documents(&texts());
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.id("python"), Some(0));
        assert_eq!(dict.id("lista"), Some(1));
        assert_eq!(dict.id("tabla"), Some(2));
        assert_eq!(dict.token(2), Some("tabla"));
        assert_eq!(dict.token(3), None);
    }

    #[test]
    fn test_doc_frequency_counts_documents_not_occurrences() {
        let dict = Dictionary::from_documents(&texts());
        assert_eq!(dict.doc_frequency(0), 1);
        assert_eq!(dict.doc_frequency(1), 2);
        assert_eq!(dict.doc_frequency(99), 0);
    }

    #[test]
    fn test_doc2bow_sorted_and_drops_unknown() {
        let dict = Dictionary::from_documents(&texts());
        let tokens: Vec<String> = ["tabla", "python", "nuevo", "python"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(dict.doc2bow(&tokens), vec![(0, 2), (2, 1)]);
    }

    #[test]
    fn test_corpus_counts() {
        let corpus = Corpus::from_texts(&texts());
        assert_eq!(corpus.num_documents(), 3);
        assert_eq!(corpus.document_lengths(), vec![3, 0, 2]);
        assert_eq!(corpus.term_frequencies(), vec![2, 2, 1]);
        assert_eq!(corpus.num_tokens(), 5);
        assert!(corpus.documents[1].is_empty());
    }
}
