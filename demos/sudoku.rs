use peg_dp::{dp, Cnf, Outcome};
use sudoku::Sudoku;

// 1-base dimac
// (row-1, col-1)'s value equals to num
fn var_num(row: i32, col: i32, num: i32) -> i32 {
    (row - 1) * 81 + (col - 1) * 9 + num
}

// notice that, since the dimac is 1-base, so we need to -1 at the beginning
// of this function
fn unpack_var_num(var: i32) -> (i32, i32, i32) {
    let var = var - 1;
    let num = var % 9;
    let col = (var - num) / 9 % 9;
    let row = (var - num - col * 9) / 81;
    (row, col, num + 1)
}

// at least one of `vars`, and no two of them
fn exactly_one(clauses: &mut Vec<Vec<i32>>, vars: &[i32]) {
    clauses.push(vars.to_vec());
    for (i, &a) in vars.iter().enumerate() {
        for &b in &vars[i + 1..] {
            clauses.push(vec![-a, -b]);
        }
    }
}

fn sudoku_to_cnf(grid: [u8; 81]) -> Vec<Vec<i32>> {
    let mut clauses = Vec::new();

    // every cell holds a number
    for row in 1..=9 {
        for col in 1..=9 {
            clauses.push((1..=9).map(|num| var_num(row, col, num)).collect());
        }
    }

    // every number once per row, column and block
    for num in 1..=9 {
        for row in 1..=9 {
            let vars: Vec<_> = (1..=9).map(|col| var_num(row, col, num)).collect();
            exactly_one(&mut clauses, &vars);
        }
        for col in 1..=9 {
            let vars: Vec<_> = (1..=9).map(|row| var_num(row, col, num)).collect();
            exactly_one(&mut clauses, &vars);
        }
        for block in 0..9 {
            let (block_row, block_col) = (block / 3 * 3, block % 3 * 3);
            let vars: Vec<_> = (0..9)
                .map(|pos| var_num(block_row + pos / 3 + 1, block_col + pos % 3 + 1, num))
                .collect();
            exactly_one(&mut clauses, &vars);
        }
    }

    // the givens
    for (index, &value) in grid.iter().enumerate() {
        if value != 0 {
            let (row, col) = (index as i32 / 9 + 1, index as i32 % 9 + 1);
            clauses.push(vec![var_num(row, col, value as i32)]);
        }
    }

    clauses
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let sudoku = Sudoku::generate();
    let cnf = Cnf::from(sudoku_to_cnf(sudoku.to_bytes()));
    println!("{} clauses over {} variables", cnf.num_clause(), cnf.vars().len());

    let Outcome::Satisfiable(assignment) = dp(&cnf)? else {
        anyhow::bail!("generated sudoku has no solution");
    };
    let true_vars = assignment.true_vars();
    assert_eq!(true_vars.len(), 81);

    let mut grid = [0; 81];
    for var in true_vars {
        let (row, col, num) = unpack_var_num(var.id() as i32);
        let index = (row * 9 + col) as usize;
        grid[index] = num as u8;
    }

    let solution = Sudoku::from_bytes(grid).map_err(|_| anyhow::anyhow!("invalid grid"))?;
    println!("{}", sudoku.display_block());
    println!("{}", solution.display_block());
    Ok(())
}
