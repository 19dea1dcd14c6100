use std::sync::OnceLock;

/// Largest polynomial order (number of coefficients) backed by the shared basis table.
pub const MAX_ORDER: usize = 12;

/// Square table of derivative multipliers.
///
/// Entry `(d, j)` is the factor produced by differentiating `t^j` exactly `d`
/// times, i.e. the falling factorial `j * (j - 1) * ... * (j - d + 1)` for
/// `j >= d` and zero otherwise. Row 0 is all ones.
#[derive(Clone, Debug, PartialEq)]
pub struct BasisTable {
    size: usize,
    /// Row-major storage, `size * size` entries.
    values: Vec<f64>,
}

impl BasisTable {
    /// Builds an `n x n` table.
    pub fn new(n: usize) -> Self {
        let mut values = vec![0.0; n * n];

        // Row 0: the polynomial itself, every power keeps a unit multiplier
        values[..n].fill(1.0);

        // Row d: one more differentiation of row d-1, t^(j-d+1) -> (j-d+1) * t^(j-d)
        for d in 1..n {
            for j in d..n {
                values[d * n + j] = values[(d - 1) * n + j] * (j - d + 1) as f64;
            }
        }

        Self { size: n, values }
    }

    /// Side length of the table.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Multiplier for differentiating `t^power` `derivative` times.
    ///
    /// # Panics
    ///
    /// Panics if either index is not below [`BasisTable::size`].
    pub fn get(&self, derivative: usize, power: usize) -> f64 {
        self.row(derivative)[power]
    }

    /// Row of multipliers for one derivative order.
    ///
    /// # Panics
    ///
    /// Panics if `derivative` is not below [`BasisTable::size`].
    pub fn row(&self, derivative: usize) -> &[f64] {
        assert!(
            derivative < self.size,
            "derivative {derivative} outside basis table of size {}",
            self.size
        );
        let start = derivative * self.size;
        &self.values[start..start + self.size]
    }
}

static BASIS: OnceLock<BasisTable> = OnceLock::new();

/// Process-wide table of side [`MAX_ORDER`], built on first use.
pub fn basis() -> &'static BasisTable {
    BASIS.get_or_init(|| {
        log::debug!("building derivative basis table up to order {MAX_ORDER}");
        BasisTable::new(MAX_ORDER)
    })
}
