#[cfg_attr(em_import, annotate("EM_IMPORT:func:now"))]
#[no_mangle]
pub extern "C" fn shapes_now() -> f64 {
    0.0
}

#[cfg_attr(em_import, annotate("EM_IMPORT:func:shapeCount"))]
pub fn count() -> usize {
    0
}
