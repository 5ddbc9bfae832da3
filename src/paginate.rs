/// Partition `rows` into pages of at most `per_page` rows, preserving
/// order; the last page takes the remainder. Both the preview path and the
/// print path go through this one function, so their page boundaries are
/// identical by construction.
pub fn paginate<T: Clone>(rows: &[T], per_page: usize) -> Vec<Vec<T>> {
    let per_page = if per_page == 0 {
        log::warn!("rows per page is 0, clamping to 1");
        1
    } else {
        per_page
    };
    rows.chunks(per_page).map(|chunk| chunk.to_vec()).collect()
}
