/// Index of the first maximum value, so ties resolve to the lowest index.
pub fn argmax<T: PartialOrd>(values: impl IntoIterator<Item = T>) -> usize {
    let mut iter = values.into_iter();
    let mut max: T = match iter.next() {
        Some(v) => v,
        None => return 0,
    };
    let mut result: usize = 0;
    for (i, v) in iter.enumerate() {
        if v > max {
            max = v;
            result = i + 1;
        }
    }
    result
}

pub fn moving_average(window: usize, vector: &[f64]) -> Vec<f64> {
    let window: usize = window.max(1);
    let mut aux: usize = 0;
    let mut result: Vec<f64> = vec![];
    while aux < vector.len() {
        let end: usize = (aux + window).min(vector.len());
        let slice: &[f64] = &vector[aux..end];
        let r: f64 = slice.iter().sum();
        result.push(r / slice.len() as f64);
        aux = end;
    }
    result
}
