pub mod bee;
pub mod brood;
pub mod population;
pub mod queen;
