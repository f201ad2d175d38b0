pub mod ipo;
