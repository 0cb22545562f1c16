pub mod shapes;

#[cfg_attr(em_import, annotate("EM_IMPORT:func:consoleLog"))]
pub fn log(message: &str) {
    let _ = message;
}

pub struct Canvas {
    width: u32,
    height: u32,
}

#[cfg_attr(em_import, annotate("EM_IMPORT:class:HTMLCanvas"))]
impl Canvas {
    #[cfg_attr(em_import, annotate("EM_IMPORT:constructor"))]
    pub fn new(width: u32, height: u32) -> Canvas {
        Canvas { width, height }
    }

    #[cfg_attr(em_import, annotate("EM_IMPORT:method:fillRect"))]
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let _ = (x, y, w, h);
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }
}
