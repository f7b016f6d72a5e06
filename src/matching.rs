use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchingError {
    #[error("edge ({0}, {1}) connects a vertex to itself")]
    SelfLoop(usize, usize),
    #[error("edge ({i}, {j}) is out of range for {vertex_count} vertices")]
    VertexOutOfRange {
        i: usize,
        j: usize,
        vertex_count: usize,
    },
    #[error("matching invariant violated: {0}")]
    Invariant(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub i: usize,
    pub j: usize,
    pub weight: i64,
}

impl Edge {
    pub fn new(i: usize, j: usize, weight: i64) -> Self {
        Self { i, j, weight }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matching {
    /// Partner of each vertex, `None` when unmatched
    pub mates: Vec<Option<usize>>,
    /// Sum of the original weights of the matched edges
    pub total_weight: i64,
}

impl Matching {
    pub fn unmatched(&self) -> Vec<usize> {
        self.mates
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_none())
            .map(|(v, _)| v)
            .collect()
    }
}

/// Finds a matching of minimum total weight.
///
/// With `max_cardinality` the matching first maximizes the number of matched
/// pairs, then minimizes weight among those.
pub fn solve(vertex_count: usize, edges: &[Edge], max_cardinality: bool) -> Result<Matching, MatchingError> {
    for e in edges {
        if e.i == e.j {
            return Err(MatchingError::SelfLoop(e.i, e.j));
        }
        if e.i >= vertex_count || e.j >= vertex_count {
            return Err(MatchingError::VertexOutOfRange {
                i: e.i,
                j: e.j,
                vertex_count,
            });
        }
    }
    let max_weight = edges.iter().map(|e| e.weight).max().unwrap_or(0);
    let flipped: Vec<Edge> = edges
        .iter()
        .map(|e| Edge::new(e.i, e.j, max_weight - e.weight))
        .collect();

    let mates = if edges.is_empty() {
        vec![None; vertex_count]
    } else {
        Blossom::new(vertex_count, &flipped, max_cardinality).run()?
    };

    for (v, mate) in mates.iter().enumerate() {
        if let Some(m) = *mate {
            if mates[m] != Some(v) {
                return Err(MatchingError::Invariant("asymmetric matching"));
            }
        }
    }

    let total_weight = edges
        .iter()
        .filter(|e| mates[e.i] == Some(e.j))
        .map(|e| e.weight)
        .sum();
    Ok(Matching { mates, total_weight })
}

const FREE: u8 = 0;
const S_LABEL: u8 = 1;
const T_LABEL: u8 = 2;
const BREADCRUMB: u8 = 4;

fn missing(what: &'static str) -> MatchingError {
    MatchingError::Invariant(what)
}

/// Index into a blossom's cyclic child list
fn cyc(idx: isize, len: usize) -> usize {
    idx.rem_euclid(len as isize) as usize
}

/// Maximum-weight matching state.
///
/// Vertices are `0..n`, non-trivial blossoms `n..2n`. Endpoint `p` of edge
/// `k = p / 2` is vertex `endpoint[p]`; `p ^ 1` is the other end.
struct Blossom<'a> {
    edges: &'a [Edge],
    n: usize,
    max_cardinality: bool,
    endpoint: Vec<usize>,
    neighbend: Vec<Vec<usize>>,
    mate: Vec<Option<usize>>,
    label: Vec<u8>,
    label_end: Vec<Option<usize>>,
    in_blossom: Vec<usize>,
    parent: Vec<Option<usize>>,
    childs: Vec<Vec<usize>>,
    base: Vec<Option<usize>>,
    endps: Vec<Vec<usize>>,
    best_edge: Vec<Option<usize>>,
    best_edges: Vec<Option<Vec<usize>>>,
    unused: Vec<usize>,
    dual: Vec<i64>,
    allow_edge: Vec<bool>,
    queue: Vec<usize>,
}

impl<'a> Blossom<'a> {
    fn new(n: usize, edges: &'a [Edge], max_cardinality: bool) -> Self {
        let max_weight = edges.iter().map(|e| e.weight).max().unwrap_or(0).max(0);
        let endpoint = edges.iter().flat_map(|e| [e.i, e.j]).collect();
        let mut neighbend = vec![Vec::new(); n];
        for (k, e) in edges.iter().enumerate() {
            neighbend[e.i].push(2 * k + 1);
            neighbend[e.j].push(2 * k);
        }
        let mut dual = vec![max_weight; n];
        dual.resize(2 * n, 0);
        let mut base: Vec<Option<usize>> = (0..n).map(Some).collect();
        base.resize(2 * n, None);
        Self {
            edges,
            n,
            max_cardinality,
            endpoint,
            neighbend,
            mate: vec![None; n],
            label: vec![FREE; 2 * n],
            label_end: vec![None; 2 * n],
            in_blossom: (0..n).collect(),
            parent: vec![None; 2 * n],
            childs: vec![Vec::new(); 2 * n],
            base,
            endps: vec![Vec::new(); 2 * n],
            best_edge: vec![None; 2 * n],
            best_edges: vec![None; 2 * n],
            unused: (n..2 * n).collect(),
            dual,
            allow_edge: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    fn slack(&self, k: usize) -> i64 {
        let e = self.edges[k];
        self.dual[e.i] + self.dual[e.j] - 2 * e.weight
    }

    fn leaves(&self, b: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t < self.n {
                out.push(t);
            } else {
                stack.extend(self.childs[t].iter().rev());
            }
        }
        out
    }

    fn assign_label(&mut self, w: usize, t: u8, p: Option<usize>) -> Result<(), MatchingError> {
        let (mut w, mut t, mut p) = (w, t, p);
        loop {
            let b = self.in_blossom[w];
            if self.label[w] != FREE || self.label[b] != FREE {
                return Err(missing("labeling an already labeled vertex"));
            }
            self.label[w] = t;
            self.label[b] = t;
            self.label_end[w] = p;
            self.label_end[b] = p;
            self.best_edge[w] = None;
            self.best_edge[b] = None;
            if t == S_LABEL {
                let leaves = self.leaves(b);
                self.queue.extend(leaves);
                return Ok(());
            }
            let base = self.base[b].ok_or(missing("T-blossom without base"))?;
            let m = self.mate[base].ok_or(missing("T-blossom base is unmatched"))?;
            w = self.endpoint[m];
            t = S_LABEL;
            p = Some(m ^ 1);
        }
    }

    /// Traces back from `v` and `w` to find a new blossom base, or `None`
    /// when the two S-vertices lie in different trees (augmenting path).
    fn scan_blossom(&mut self, v: usize, w: usize) -> Result<Option<usize>, MatchingError> {
        let mut path = Vec::new();
        let mut base = None;
        let (mut v, mut w) = (Some(v), Some(w));
        while let Some(cur) = v {
            let b = self.in_blossom[cur];
            if self.label[b] & BREADCRUMB != 0 {
                base = self.base[b];
                break;
            }
            path.push(b);
            self.label[b] = S_LABEL | BREADCRUMB;
            v = match self.label_end[b] {
                None => None,
                Some(le) => {
                    let t = self.in_blossom[self.endpoint[le]];
                    let le_t = self.label_end[t].ok_or(missing("T-blossom without label end"))?;
                    Some(self.endpoint[le_t])
                }
            };
            if w.is_some() {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = S_LABEL;
        }
        Ok(base)
    }

    fn add_blossom(&mut self, base: usize, k: usize) -> Result<(), MatchingError> {
        let e = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[e.i];
        let mut bw = self.in_blossom[e.j];
        let b = self.unused.pop().ok_or(missing("out of blossom slots"))?;
        self.base[b] = Some(base);
        self.parent[b] = None;
        self.parent[bb] = Some(b);

        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.parent[bv] = Some(b);
            path.push(bv);
            let le = self.label_end[bv].ok_or(missing("blossom child without label end"))?;
            endps.push(le);
            bv = self.in_blossom[self.endpoint[le]];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.parent[bw] = Some(b);
            path.push(bw);
            let le = self.label_end[bw].ok_or(missing("blossom child without label end"))?;
            endps.push(le ^ 1);
            bw = self.in_blossom[self.endpoint[le]];
        }

        self.label[b] = S_LABEL;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0;
        self.childs[b] = path.clone();
        self.endps[b] = endps;

        for v in self.leaves(b) {
            if self.label[self.in_blossom[v]] == T_LABEL {
                self.queue.push(v);
            }
            self.in_blossom[v] = b;
        }

        let mut best_to: Vec<Option<usize>> = vec![None; 2 * self.n];
        for &child in &path {
            let candidates: Vec<usize> = match self.best_edges[child].take() {
                Some(list) => list,
                None => {
                    let mut list = Vec::new();
                    for leaf in self.leaves(child) {
                        list.extend(self.neighbend[leaf].iter().map(|&p| p / 2));
                    }
                    list
                }
            };
            for k in candidates {
                let e = self.edges[k];
                let j = if self.in_blossom[e.j] == b { e.i } else { e.j };
                let bj = self.in_blossom[j];
                if bj != b
                    && self.label[bj] == S_LABEL
                    && best_to[bj].map_or(true, |bk| self.slack(k) < self.slack(bk))
                {
                    best_to[bj] = Some(k);
                }
            }
            self.best_edge[child] = None;
        }
        let list: Vec<usize> = best_to.into_iter().flatten().collect();
        let mut best = None;
        for &k in &list {
            if best.map_or(true, |bk| self.slack(k) < self.slack(bk)) {
                best = Some(k);
            }
        }
        self.best_edge[b] = best;
        self.best_edges[b] = Some(list);
        Ok(())
    }

    fn expand_blossom(&mut self, b: usize, end_stage: bool) -> Result<(), MatchingError> {
        let childs = self.childs[b].clone();
        for &s in &childs {
            self.parent[s] = None;
            if s < self.n {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual[s] == 0 {
                self.expand_blossom(s, end_stage)?;
            } else {
                for v in self.leaves(s) {
                    self.in_blossom[v] = s;
                }
            }
        }

        if !end_stage && self.label[b] == T_LABEL {
            let len = childs.len();
            let le_b = self.label_end[b].ok_or(missing("T-blossom without label end"))?;
            let entry = self.in_blossom[self.endpoint[le_b ^ 1]];
            let entry_pos = childs
                .iter()
                .position(|&c| c == entry)
                .ok_or(missing("entry child not in blossom"))?;
            let mut j = entry_pos as isize;
            let (step, trick): (isize, usize) = if entry_pos & 1 == 1 {
                j -= len as isize;
                (1, 0)
            } else {
                (-1, 1)
            };
            let endps = self.endps[b].clone();
            let mut p = le_b;
            while j != 0 {
                self.label[self.endpoint[p ^ 1]] = FREE;
                let q = endps[cyc(j - trick as isize, len)];
                self.label[self.endpoint[q ^ trick ^ 1]] = FREE;
                self.assign_label(self.endpoint[p ^ 1], T_LABEL, Some(p))?;
                self.allow_edge[q / 2] = true;
                j += step;
                p = endps[cyc(j - trick as isize, len)] ^ trick;
                self.allow_edge[p / 2] = true;
                j += step;
            }
            let bv = childs[cyc(j, len)];
            self.label[self.endpoint[p ^ 1]] = T_LABEL;
            self.label[bv] = T_LABEL;
            self.label_end[self.endpoint[p ^ 1]] = Some(p);
            self.label_end[bv] = Some(p);
            self.best_edge[bv] = None;
            j += step;
            while childs[cyc(j, len)] != entry {
                let bv = childs[cyc(j, len)];
                if self.label[bv] == S_LABEL {
                    j += step;
                    continue;
                }
                let labeled = self.leaves(bv).into_iter().find(|&v| self.label[v] != FREE);
                if let Some(v) = labeled {
                    self.label[v] = FREE;
                    let base = self.base[bv].ok_or(missing("sub-blossom without base"))?;
                    let m = self.mate[base].ok_or(missing("sub-blossom base is unmatched"))?;
                    self.label[self.endpoint[m]] = FREE;
                    let le_v = self.label_end[v];
                    self.assign_label(v, T_LABEL, le_v)?;
                }
                j += step;
            }
        }

        self.label[b] = FREE;
        self.label_end[b] = None;
        self.childs[b] = Vec::new();
        self.endps[b] = Vec::new();
        self.base[b] = None;
        self.best_edges[b] = None;
        self.best_edge[b] = None;
        self.unused.push(b);
        Ok(())
    }

    /// Swaps matched and unmatched edges along the path from `v` to the base of `b`
    fn augment_blossom(&mut self, b: usize, v: usize) -> Result<(), MatchingError> {
        let mut t = v;
        while self.parent[t] != Some(b) {
            t = self.parent[t].ok_or(missing("vertex is not inside blossom"))?;
        }
        if t >= self.n {
            self.augment_blossom(t, v)?;
        }
        let childs = self.childs[b].clone();
        let len = childs.len();
        let i = childs
            .iter()
            .position(|&c| c == t)
            .ok_or(missing("child not in blossom"))?;
        let mut j = i as isize;
        let (step, trick): (isize, usize) = if i & 1 == 1 {
            j -= len as isize;
            (1, 0)
        } else {
            (-1, 1)
        };
        while j != 0 {
            j += step;
            let t = childs[cyc(j, len)];
            let p = self.endps[b][cyc(j - trick as isize, len)] ^ trick;
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p])?;
            }
            j += step;
            let t = childs[cyc(j, len)];
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p ^ 1])?;
            }
            self.mate[self.endpoint[p]] = Some(p ^ 1);
            self.mate[self.endpoint[p ^ 1]] = Some(p);
        }
        self.childs[b].rotate_left(i);
        self.endps[b].rotate_left(i);
        self.base[b] = self.base[self.childs[b][0]];
        if self.base[b] != Some(v) {
            return Err(missing("blossom base did not move to the augmented vertex"));
        }
        Ok(())
    }

    fn augment_matching(&mut self, k: usize) -> Result<(), MatchingError> {
        let e = self.edges[k];
        for (start, start_p) in [(e.i, 2 * k + 1), (e.j, 2 * k)] {
            let (mut s, mut p) = (start, start_p);
            loop {
                let bs = self.in_blossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s)?;
                }
                self.mate[s] = Some(p);
                let Some(le) = self.label_end[bs] else {
                    break;
                };
                let bt = self.in_blossom[self.endpoint[le]];
                let le_t = self.label_end[bt].ok_or(missing("T-blossom without label end"))?;
                s = self.endpoint[le_t];
                let j = self.endpoint[le_t ^ 1];
                if bt >= self.n {
                    self.augment_blossom(bt, j)?;
                }
                self.mate[j] = Some(le_t);
                p = le_t ^ 1;
            }
        }
        Ok(())
    }

    fn run(mut self) -> Result<Vec<Option<usize>>, MatchingError> {
        let n = self.n;
        for _ in 0..n {
            self.label.iter_mut().for_each(|l| *l = FREE);
            self.best_edge.iter_mut().for_each(|b| *b = None);
            self.best_edges[n..].iter_mut().for_each(|b| *b = None);
            self.allow_edge.iter_mut().for_each(|a| *a = false);
            self.queue.clear();

            for v in 0..n {
                if self.mate[v].is_none() && self.label[self.in_blossom[v]] == FREE {
                    self.assign_label(v, S_LABEL, None)?;
                }
            }

            let mut augmented = false;
            loop {
                while !augmented {
                    let Some(v) = self.queue.pop() else {
                        break;
                    };
                    for idx in 0..self.neighbend[v].len() {
                        let p = self.neighbend[v][idx];
                        let k = p / 2;
                        let w = self.endpoint[p];
                        if self.in_blossom[v] == self.in_blossom[w] {
                            continue;
                        }
                        let mut kslack = 0;
                        if !self.allow_edge[k] {
                            kslack = self.slack(k);
                            if kslack <= 0 {
                                self.allow_edge[k] = true;
                            }
                        }
                        let bw = self.in_blossom[w];
                        if self.allow_edge[k] {
                            if self.label[bw] == FREE {
                                self.assign_label(w, T_LABEL, Some(p ^ 1))?;
                            } else if self.label[bw] == S_LABEL {
                                match self.scan_blossom(v, w)? {
                                    Some(base) => self.add_blossom(base, k)?,
                                    None => {
                                        self.augment_matching(k)?;
                                        augmented = true;
                                        break;
                                    }
                                }
                            } else if self.label[w] == FREE {
                                self.label[w] = T_LABEL;
                                self.label_end[w] = Some(p ^ 1);
                            }
                        } else if self.label[bw] == S_LABEL {
                            let bv = self.in_blossom[v];
                            if self.best_edge[bv].map_or(true, |bk| kslack < self.slack(bk)) {
                                self.best_edge[bv] = Some(k);
                            }
                        } else if self.label[w] == FREE
                            && self.best_edge[w].map_or(true, |bk| kslack < self.slack(bk))
                        {
                            self.best_edge[w] = Some(k);
                        }
                    }
                }
                if augmented {
                    break;
                }

                // No augmenting path under the current duals: pick the smallest dual change
                let mut delta_type = 0u8;
                let mut delta = 0i64;
                let mut delta_edge = None;
                let mut delta_blossom = None;

                if !self.max_cardinality {
                    delta_type = 1;
                    delta = self.dual[..n].iter().copied().min().unwrap_or(0);
                }
                for v in 0..n {
                    if self.label[self.in_blossom[v]] == FREE {
                        if let Some(k) = self.best_edge[v] {
                            let d = self.slack(k);
                            if delta_type == 0 || d < delta {
                                delta = d;
                                delta_type = 2;
                                delta_edge = Some(k);
                            }
                        }
                    }
                }
                for b in 0..2 * n {
                    if self.parent[b].is_none() && self.label[b] == S_LABEL {
                        if let Some(k) = self.best_edge[b] {
                            let d = self.slack(k) / 2;
                            if delta_type == 0 || d < delta {
                                delta = d;
                                delta_type = 3;
                                delta_edge = Some(k);
                            }
                        }
                    }
                }
                for b in n..2 * n {
                    if self.base[b].is_some()
                        && self.parent[b].is_none()
                        && self.label[b] == T_LABEL
                        && (delta_type == 0 || self.dual[b] < delta)
                    {
                        delta = self.dual[b];
                        delta_type = 4;
                        delta_blossom = Some(b);
                    }
                }
                if delta_type == 0 {
                    delta_type = 1;
                    delta = self.dual[..n].iter().copied().min().unwrap_or(0).max(0);
                }

                for v in 0..n {
                    match self.label[self.in_blossom[v]] {
                        S_LABEL => self.dual[v] -= delta,
                        T_LABEL => self.dual[v] += delta,
                        _ => {}
                    }
                }
                for b in n..2 * n {
                    if self.base[b].is_some() && self.parent[b].is_none() {
                        match self.label[b] {
                            S_LABEL => self.dual[b] += delta,
                            T_LABEL => self.dual[b] -= delta,
                            _ => {}
                        }
                    }
                }

                match delta_type {
                    1 => break,
                    2 => {
                        let k = delta_edge.ok_or(missing("delta edge"))?;
                        self.allow_edge[k] = true;
                        let e = self.edges[k];
                        let i = if self.label[self.in_blossom[e.i]] == FREE { e.j } else { e.i };
                        self.queue.push(i);
                    }
                    3 => {
                        let k = delta_edge.ok_or(missing("delta edge"))?;
                        self.allow_edge[k] = true;
                        self.queue.push(self.edges[k].i);
                    }
                    _ => {
                        let b = delta_blossom.ok_or(missing("delta blossom"))?;
                        self.expand_blossom(b, false)?;
                    }
                }
            }

            if !augmented {
                break;
            }

            for b in n..2 * n {
                if self.parent[b].is_none()
                    && self.base[b].is_some()
                    && self.label[b] == S_LABEL
                    && self.dual[b] == 0
                {
                    self.expand_blossom(b, true)?;
                }
            }
        }

        Ok(self
            .mate
            .iter()
            .map(|m| m.map(|p| self.endpoint[p]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(list: &[(usize, usize, i64)]) -> Vec<Edge> {
        list.iter().map(|&(i, j, w)| Edge::new(i, j, w)).collect()
    }

    #[test]
    fn test_empty_graph() {
        let m = solve(3, &[], true).unwrap();
        assert_eq!(m.mates, vec![None, None, None]);
        assert_eq!(m.total_weight, 0);
        assert_eq!(m.unmatched(), vec![0, 1, 2]);
    }

    #[test]
    fn test_single_edge() {
        let m = solve(2, &edges(&[(0, 1, 5)]), true).unwrap();
        assert_eq!(m.mates, vec![Some(1), Some(0)]);
        assert_eq!(m.total_weight, 5);
    }

    #[test]
    fn test_prefers_cheaper_perfect_matching() {
        // 0-1 + 2-3 = 2 beats 0-2 + 1-3 = 20 and 0-3 + 1-2 = 11
        let g = edges(&[
            (0, 1, 1),
            (2, 3, 1),
            (0, 2, 10),
            (1, 3, 10),
            (0, 3, 1),
            (1, 2, 10),
        ]);
        let m = solve(4, &g, true).unwrap();
        assert_eq!(m.mates, vec![Some(1), Some(0), Some(3), Some(2)]);
        assert_eq!(m.total_weight, 2);
    }

    #[test]
    fn test_max_cardinality_beats_weight() {
        // A path 0-1-2-3: the cheap middle edge would leave two vertices unmatched
        let g = edges(&[(0, 1, 100), (1, 2, 1), (2, 3, 100)]);
        let m = solve(4, &g, true).unwrap();
        assert_eq!(m.mates, vec![Some(1), Some(0), Some(3), Some(2)]);
        assert_eq!(m.total_weight, 200);
    }

    #[test]
    fn test_blossom_is_resolved() {
        // Odd cycle 0-1-2 with a tail from 2 to 3 and 0 to 4, plus 4-5
        let g = edges(&[
            (0, 1, 3),
            (1, 2, 3),
            (0, 2, 3),
            (2, 3, 8),
            (0, 4, 8),
            (4, 5, 2),
            (1, 5, 9),
        ]);
        let m = solve(6, &g, true).unwrap();
        assert!(m.unmatched().is_empty());
        // Only perfect matchings: {2-3, 0-4, 1-5} = 25, {2-3, 0-1, 4-5} = 13
        assert_eq!(m.total_weight, 13);
        assert_eq!(m.mates[2], Some(3));
        assert_eq!(m.mates[0], Some(1));
        assert_eq!(m.mates[4], Some(5));
    }

    #[test]
    fn test_overconstrained_graph_leaves_vertices_unmatched() {
        // Vertex 3 has no edges at all
        let g = edges(&[(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        let m = solve(4, &g, true).unwrap();
        assert_eq!(m.mates.iter().filter(|x| x.is_some()).count(), 2);
        assert_eq!(m.mates[3], None);
    }

    #[test]
    fn test_complete_graph_matches_brute_force() {
        // Deterministic pseudo-random weights on K6
        let mut g = Vec::new();
        let mut x: i64 = 17;
        for i in 0..6 {
            for j in (i + 1)..6 {
                x = (x * 37 + 11) % 101;
                g.push(Edge::new(i, j, x));
            }
        }
        let m = solve(6, &g, true).unwrap();
        let weight = |a: usize, b: usize| {
            g.iter()
                .find(|e| (e.i == a && e.j == b) || (e.i == b && e.j == a))
                .map(|e| e.weight)
                .unwrap()
        };
        let mut best = i64::MAX;
        let others = [1usize, 2, 3, 4, 5];
        for &a in &others {
            let rest: Vec<usize> = others.iter().copied().filter(|&v| v != a).collect();
            for &b in &rest[1..] {
                let last: Vec<usize> = rest[1..].iter().copied().filter(|&v| v != b).collect();
                let total = weight(0, a) + weight(rest[0], b) + weight(last[0], last[1]);
                best = best.min(total);
            }
        }
        assert_eq!(m.total_weight, best);
        assert!(m.unmatched().is_empty());
    }

    #[test]
    fn test_rejects_bad_edges() {
        assert_eq!(
            solve(2, &edges(&[(1, 1, 0)]), true),
            Err(MatchingError::SelfLoop(1, 1))
        );
        assert!(matches!(
            solve(2, &edges(&[(0, 2, 0)]), true),
            Err(MatchingError::VertexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let g = edges(&[(0, 1, 4), (2, 3, 4), (0, 2, 4), (1, 3, 4), (0, 3, 4), (1, 2, 4)]);
        let a = solve(4, &g, true).unwrap();
        let b = solve(4, &g, true).unwrap();
        assert_eq!(a, b);
    }
}
