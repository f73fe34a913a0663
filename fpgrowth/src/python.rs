use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::fp::{MiningConfig, SupportThreshold, ThresholdPolicy, fp_growth_with_config};

type PyLevel<'py> = (Bound<'py, PyArray2<usize>>, Bound<'py, PyArray1<usize>>);

/// Mine a binary transaction matrix.
///
/// Returns one `(itemsets, supports)` pair per itemset length, skipping
/// lengths with no frequent itemset.
#[pyfunction]
#[pyo3(
    name = "fp_growth",
    signature = (transactions, min_support, exclusive = false, max_len = None)
)]
fn fp_growth_py<'py>(
    py: Python<'py>,
    transactions: PyReadonlyArray2<'py, i32>,
    min_support: f64,
    exclusive: bool,
    max_len: Option<usize>,
) -> PyResult<Vec<PyLevel<'py>>> {
    let policy = if exclusive {
        ThresholdPolicy::Exclusive
    } else {
        ThresholdPolicy::Inclusive
    };
    let mut config = MiningConfig::new(SupportThreshold::Fraction(min_support)).with_policy(policy);
    config.max_len = max_len;

    let frequent_levels = fp_growth_with_config(transactions.as_array(), &config)
        .map_err(|err| PyValueError::new_err(err.to_string()))?;

    let mut result = Vec::new();
    for level in frequent_levels {
        if level.is_empty() {
            continue;
        }

        let itemset_size = level.itemset_size;
        let num_itemsets = level.len();
        let mut data = Vec::with_capacity(num_itemsets * itemset_size);
        let mut supports = Vec::with_capacity(num_itemsets);
        for (itemset, support) in level.iter() {
            data.extend_from_slice(itemset);
            supports.push(support);
        }

        let itemsets = Array2::from_shape_vec((num_itemsets, itemset_size), data)
            .map_err(|_| PyValueError::new_err("Failed to create array"))?;

        result.push((itemsets.into_pyarray(py), Array1::from(supports).into_pyarray(py)));
    }

    Ok(result)
}

#[pymodule]
fn fpgrowth(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(fp_growth_py, m)?)?;
    Ok(())
}
