pub mod render_bmp;
