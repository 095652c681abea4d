use crate::avl_tree::node::Node;
use std::borrow::Borrow;
use std::cmp::Ordering;

pub type Tree<T> = Option<Box<Node<T>>>;

pub fn height<T>(tree: &Tree<T>) -> usize {
    match tree {
        None => 0,
        Some(ref node) => (**node).height,
    }
}

fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = match node.right.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    node.right = child.left.take();
    node.update();
    child.left = Some(node);
    child.update();
    child
}

fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = match node.left.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    node.left = child.right.take();
    node.update();
    child.right = Some(node);
    child.update();
    child
}

// precondition: at most one insert or remove occurred since the subtrees were last balanced, so
// the balance factor of the node is in [-2, 2]
fn balance<T>(tree: &mut Tree<T>) {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return,
    };

    node.update();

    let factor = node.balance_factor();
    debug_assert!(factor.abs() <= 2, "balance factor out of range: {}", factor);

    if factor == 2 {
        if let Some(child) = node.right.take() {
            if child.balance_factor() < 0 {
                node.right = Some(rotate_right(child));
            } else {
                node.right = Some(child);
            }
        }
        node = rotate_left(node);
    } else if factor == -2 {
        if let Some(child) = node.left.take() {
            if child.balance_factor() > 0 {
                node.left = Some(rotate_left(child));
            } else {
                node.left = Some(child);
            }
        }
        node = rotate_right(node);
    }

    *tree = Some(node);
}

// precondition: there exists a minimum node in the tree
fn remove_min<T>(tree: &mut Tree<T>) -> Box<Node<T>> {
    if let Some(ref mut node) = tree {
        if node.left.is_some() {
            let min_node = remove_min(&mut node.left);
            balance(tree);
            return min_node;
        }
    }

    match tree.take() {
        Some(mut node) => {
            *tree = node.right.take();
            node
        },
        _ => unreachable!(),
    }
}

fn combine_subtrees<T>(left_tree: Tree<T>, mut right_tree: Tree<T>) -> Tree<T> {
    let mut new_root = remove_min(&mut right_tree);
    new_root.left = left_tree;
    new_root.right = right_tree;
    Some(new_root)
}

pub fn insert<T>(tree: &mut Tree<T>, key: T) -> bool
where
    T: Ord,
{
    let inserted = match tree {
        Some(ref mut node) => match key.cmp(&node.key) {
            Ordering::Less => insert(&mut node.left, key),
            Ordering::Greater => insert(&mut node.right, key),
            Ordering::Equal => return false,
        },
        None => {
            *tree = Some(Box::new(Node::new(key)));
            return true;
        },
    };

    if inserted {
        balance(tree);
    }
    inserted
}

pub fn remove<T, V>(tree: &mut Tree<T>, key: &V) -> bool
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let removed = match tree.take() {
        Some(mut node) => match key.cmp(node.key.borrow()) {
            Ordering::Less => {
                let removed = remove(&mut node.left, key);
                *tree = Some(node);
                removed
            },
            Ordering::Greater => {
                let removed = remove(&mut node.right, key);
                *tree = Some(node);
                removed
            },
            Ordering::Equal => {
                let unboxed_node = *node;
                let Node { left, right, .. } = unboxed_node;
                match right {
                    None => *tree = left,
                    right => *tree = combine_subtrees(left, right),
                }
                true
            },
        },
        None => return false,
    };

    if removed {
        balance(tree);
    }
    removed
}

pub fn get<'a, T, V>(tree: &'a Tree<T>, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    tree.as_ref().and_then(|node| {
        match key.cmp(node.key.borrow()) {
            Ordering::Less => get(&node.left, key),
            Ordering::Greater => get(&node.right, key),
            Ordering::Equal => Some(&node.key),
        }
    })
}

pub fn min<T>(tree: &Tree<T>) -> Option<&T>
where
    T: Ord,
{
    tree.as_ref().and_then(|node| {
        let mut curr = node;
        while let Some(ref left_node) = curr.left {
            curr = left_node;
        }
        Some(&curr.key)
    })
}

pub fn max<T>(tree: &Tree<T>) -> Option<&T>
where
    T: Ord,
{
    tree.as_ref().and_then(|node| {
        let mut curr = node;
        while let Some(ref right_node) = curr.right {
            curr = right_node;
        }
        Some(&curr.key)
    })
}

pub fn count<T>(tree: &Tree<T>) -> usize {
    match tree {
        None => 0,
        Some(ref node) => count(&node.left) + 1 + count(&node.right),
    }
}

pub fn is_balanced<T>(tree: &Tree<T>) -> bool {
    match tree {
        None => true,
        Some(ref node) => {
            is_balanced(&node.left) && node.balance_factor().abs() <= 1 && is_balanced(&node.right)
        },
    }
}
