pub mod write_bmp;
