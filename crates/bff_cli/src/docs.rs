//! Documents file: one `<id>\t<term> <term> ...` per line.
use anyhow::{anyhow, Context, Result};
use bff_core::{Verifier, VerifyError};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default)]
pub struct DocStore {
    order: Vec<u64>,
    docs: HashMap<u64, Vec<Vec<u8>>>,
}

impl DocStore {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut store = Self::default();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let (id, rest) = line.split_once('\t').unwrap_or((line, ""));
            let id: u64 = id
                .trim()
                .parse()
                .map_err(|e| anyhow!("line {}: bad id {id:?}: {e}", n + 1))?;
            let terms: Vec<Vec<u8>> =
                rest.split_whitespace().map(|t| t.as_bytes().to_vec()).collect();
            if store.docs.insert(id, terms).is_some() {
                return Err(anyhow!("line {}: duplicate id {id}", n + 1));
            }
            store.order.push(id);
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Documents in file order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &[Vec<u8>])> {
        self.order.iter().map(|id| (*id, self.docs[id].as_slice()))
    }
}

/// Exact containment: every non-empty query term must be one of the document's terms.
impl Verifier for DocStore {
    fn verify(&self, id: u64, terms: &[Vec<u8>]) -> Result<bool, VerifyError> {
        let doc = self.docs.get(&id).ok_or_else(|| format!("document {id} not loaded"))?;
        Ok(terms.iter().filter(|t| !t.is_empty()).all(|t| doc.contains(t)))
    }
}
