// Purpose: Module-manifest layer: locate and read the go.mod module declaration.
// Inputs/Outputs: Yields the ModuleName every import rewrite in a run is qualified with.
// Invariants: The module name is read once per run and never mutated afterwards.

pub mod modfile;
