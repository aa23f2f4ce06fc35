pub mod common;



#[cfg(test)]
mod test_defenses;


#[cfg(test)]
mod test_on_hit_effects;


#[cfg(test)]
mod test_buff_cycles;
