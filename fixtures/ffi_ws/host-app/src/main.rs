use canvas_core::Canvas;

extern "C" {
    #[cfg_attr(em_import, annotate("EM_IMPORT:func:hostRandom"))]
    fn host_random() -> f64;
}

fn main() {
    let mut canvas = Canvas::new(4, 3);
    canvas.fill_rect(0.0, 0.0, 1.0, 1.0);
    canvas_core::log("drawn");
    let _ = unsafe { host_random() };
}
